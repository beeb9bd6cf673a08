use crate::domain::models::{Goal, NewGoal};
use crate::domain::repository::GoalRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct GoalTable {
    last_id: i64,
    rows: BTreeMap<i64, Goal>,
}

/// In-process stand-in for the `Goal` table. Ids are never reused, even
/// after the row holding them is deleted.
#[derive(Clone, Default)]
pub struct InMemoryGoalRepository {
    storage: Arc<RwLock<GoalTable>>,
}

impl InMemoryGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalRepository for InMemoryGoalRepository {
    #[instrument(skip(self))]
    async fn list_goals_by_owner(&self, owner_id: i64) -> Result<Vec<Goal>> {
        let storage = self.storage.read().await;
        let goals: Vec<Goal> = storage
            .rows
            .values()
            .filter(|goal| goal.user_id == owner_id)
            .cloned()
            .collect();
        debug!(owner_id, count = goals.len(), "Goals listed from memory storage");
        Ok(goals)
    }

    #[instrument(skip(self, goal), fields(user_id = goal.user_id))]
    async fn insert_goal(&self, goal: NewGoal) -> Result<Goal> {
        let mut storage = self.storage.write().await;
        storage.last_id += 1;
        let saved = Goal {
            id: storage.last_id,
            title: goal.title,
            description: goal.description,
            due_date: goal.due_date,
            user_id: goal.user_id,
        };
        storage.rows.insert(saved.id, saved.clone());
        debug!(goal_id = saved.id, "Goal saved to memory storage");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn delete_goal(&self, goal_id: i64) -> Result<u64> {
        let mut storage = self.storage.write().await;
        let removed = u64::from(storage.rows.remove(&goal_id).is_some());
        debug!(goal_id, removed, "Goal delete applied to memory storage");
        Ok(removed)
    }
}
