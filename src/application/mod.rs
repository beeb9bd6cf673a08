pub mod goal_service;
pub mod user_service;
