use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, NewUser, User};
use crate::infrastructure::security::CredentialHasher;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

pub const MISSING_USER_FIELDS: &str = "Name, Email and Password are required";

pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    hasher: CredentialHasher,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>, hasher: CredentialHasher) -> Self {
        Self { repository, hasher }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.repository.list_users().await?;
        debug!(count = users.len(), "Users listed");
        Ok(users)
    }

    #[instrument(skip(self, req))]
    pub async fn create_user(&self, req: CreateUser) -> Result<User> {
        trace!("Starting user creation");

        let (Some(name), Some(email), Some(password)) = (
            present(req.name),
            present(req.email),
            present(req.password),
        ) else {
            warn!("User creation rejected: missing fields");
            return Err(DomainError::validation(MISSING_USER_FIELDS).into());
        };

        // Argon2 is deliberately slow; keep it off the async workers.
        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {}", e))
            })?;

        let user = self
            .repository
            .insert_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "User created");
        Ok(user)
    }
}

/// `None` for absent or empty strings.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
