use crate::domain::models::{CreateGoal, GoalsQuery, OkResponse};
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state))]
pub async fn list_goals(
    state: web::Data<AppState>,
    query: web::Query<GoalsQuery>,
) -> Result<HttpResponse, ApiError> {
    let goals = state
        .goals
        .list_goals(query.user_id.as_deref())
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch goals"))?;
    info!(count = goals.len(), "Goals fetched");
    Ok(HttpResponse::Ok().json(goals))
}

#[instrument(skip(state, req), fields(goal_id))]
pub async fn create_goal(
    state: web::Data<AppState>,
    req: web::Json<CreateGoal>,
) -> Result<HttpResponse, ApiError> {
    info!(user_id = ?req.user_id, "Create goal request received");
    let goal = state
        .goals
        .create_goal(req.into_inner())
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create goal"))?;
    tracing::Span::current().record("goal_id", goal.id);
    Ok(HttpResponse::Ok().json(goal))
}

#[instrument(skip(state), fields(goal_id = %*path))]
pub async fn delete_goal(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let goal_id = path.into_inner();
    state
        .goals
        .delete_goal(&goal_id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete goal"))?;
    Ok(HttpResponse::Ok().json(OkResponse { ok: true }))
}
