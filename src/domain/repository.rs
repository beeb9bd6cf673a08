use crate::domain::models::{Goal, NewGoal};
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn insert_user(&self, user: NewUser) -> Result<User>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn list_goals_by_owner(&self, owner_id: i64) -> Result<Vec<Goal>>;
    async fn insert_goal(&self, goal: NewGoal) -> Result<Goal>;
    /// Returns the number of rows removed; zero is not an error.
    async fn delete_goal(&self, goal_id: i64) -> Result<u64>;
}
