pub mod goals;
pub mod handlers;
pub mod middleware;
pub mod users;

use crate::presentation::handlers::{ApiError, health_check};
use actix_web::web;

/// Register every route plus the extractor error handlers. Shared by the
/// binary and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query string: {}", err)).into()
    }))
    .route("/", web::get().to(health_check))
    .route("/users", web::get().to(users::list_users))
    .route("/add_user", web::post().to(users::add_user))
    .route("/goals", web::get().to(goals::list_goals))
    .route("/goals", web::post().to(goals::create_goal))
    .route("/goals/{id}", web::delete().to(goals::delete_goal));
}
