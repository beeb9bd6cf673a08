use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct UserTable {
    last_id: i64,
    rows: Vec<StoredUser>,
}

/// In-process stand-in for the `User` table.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored credential hash for a user, if the user exists.
    pub async fn password_hash(&self, id: i64) -> Option<String> {
        let storage = self.storage.read().await;
        storage
            .rows
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| row.password_hash.clone())
    }

    pub async fn len(&self) -> usize {
        self.storage.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let users: Vec<User> = storage.rows.iter().map(|row| row.user.clone()).collect();
        debug!(count = users.len(), "Users listed from memory storage");
        Ok(users)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;

        // Mirrors the UNIQUE constraint on User.Email.
        if storage.rows.iter().any(|row| row.user.email == user.email) {
            warn!(email = %user.email, "Duplicate email rejected by memory storage");
            bail!("Duplicate entry '{}' for key 'User.Email'", user.email);
        }

        storage.last_id += 1;
        let saved = User {
            id: storage.last_id,
            name: user.name,
            email: user.email,
        };
        storage.rows.push(StoredUser {
            user: saved.clone(),
            password_hash: user.password_hash,
        });
        debug!(user_id = saved.id, email = %saved.email, "User saved to memory storage");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: format!("hash-of-{}", name),
        }
    }

    #[tokio::test]
    async fn test_insert_user_assigns_increasing_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.insert_user(new_user("A", "a@x.com")).await.unwrap();
        let second = repo.insert_user(new_user("B", "b@x.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.name, "B");
        assert_eq!(second.email, "b@x.com");
    }

    #[tokio::test]
    async fn test_list_users_keeps_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for i in 1..=3 {
            repo.insert_user(new_user(&format!("user{}", i), &format!("u{}@x.com", i)))
                .await
                .unwrap();
        }

        let users = repo.list_users().await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["user1", "user2", "user3"]);
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.list_users().await.unwrap().is_empty());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(new_user("A", "dup@x.com")).await.unwrap();

        let result = repo.insert_user(new_user("B", "dup@x.com")).await;
        assert!(result.is_err());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_password_hash_is_kept_out_of_user_view() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert_user(new_user("A", "a@x.com")).await.unwrap();

        assert_eq!(repo.password_hash(user.id).await.as_deref(), Some("hash-of-A"));
        assert!(repo.password_hash(user.id + 1).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                tokio::spawn(async move {
                    repo_clone
                        .insert_user(new_user(&format!("u{}", i), &format!("u{}@x.com", i)))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
    }
}
