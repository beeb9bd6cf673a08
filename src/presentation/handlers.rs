use crate::application::goal_service::GoalService;
use crate::application::user_service::UserService;
use crate::domain::error::DomainError;
use crate::domain::models::HealthResponse;
use crate::domain::repository::{GoalRepository, UserRepository};
use crate::infrastructure::security::CredentialHasher;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

pub const SERVICE_NAME: &str = "Lock In API";

/// Shared request state. Repositories are injected so tests can swap the
/// MySQL store for the in-memory one.
pub struct AppState {
    pub users: UserService<dyn UserRepository>,
    pub goals: GoalService<dyn GoalRepository>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        goal_repository: Arc<dyn GoalRepository>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            users: UserService::new(user_repository, hasher),
            goals: GoalService::new(goal_repository),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Generic per-route failure; the cause is logged, never returned.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a service failure onto the HTTP taxonomy. Anything that is not a
    /// validation failure collapses into `failure`.
    pub fn from_service(err: anyhow::Error, failure: &'static str) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            _ => {
                error!(error = ?err, failure, "Service call failed");
                ApiError::Internal(failure)
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        match self {
            ApiError::Validation(_) => {
                warn!(error = %error_msg, status = %status, "Validation error")
            }
            // Cause already logged by `from_service`.
            ApiError::Internal(_) => {
                debug!(error = %error_msg, status = %status, "Internal error")
            }
        }

        HttpResponse::build(status).json(ErrorResponse { error: error_msg })
    }
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
}
