use crate::domain::user::CreateUser;
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state))]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state
        .users
        .list_users()
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch users"))?;
    info!(count = users.len(), "Users fetched");
    Ok(HttpResponse::Ok().json(users))
}

#[instrument(skip(state, req), fields(user_id))]
pub async fn add_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!(email = ?req.email, "Add user request received");
    let user = state
        .users
        .create_user(req.into_inner())
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to add user"))?;
    tracing::Span::current().record("user_id", user.id);
    info!(user_id = user.id, email = %user.email, "User added");
    Ok(HttpResponse::Ok().json(user))
}
