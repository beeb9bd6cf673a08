use crate::application::user_service::present;
use crate::domain::due_date::parse_due_date;
use crate::domain::error::DomainError;
use crate::domain::models::{CreateGoal, Goal, NewGoal};
use crate::domain::repository::GoalRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const MISSING_GOAL_FIELDS: &str = "Title, DueDate and UserID are required";
pub const MISSING_USER_ID: &str = "userId is required";

pub struct GoalService<R: GoalRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: GoalRepository + ?Sized> GoalService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Goals owned by `owner_id`, which arrives as the raw query value.
    #[instrument(skip(self))]
    pub async fn list_goals(&self, owner_id: Option<&str>) -> Result<Vec<Goal>> {
        let raw = owner_id.filter(|v| !v.is_empty()).ok_or_else(|| {
            warn!("Goal listing rejected: missing userId");
            DomainError::validation(MISSING_USER_ID)
        })?;
        let owner_id = parse_id(raw, "userId")?;

        let goals = self.repository.list_goals_by_owner(owner_id).await?;
        debug!(owner_id, count = goals.len(), "Goals listed");
        Ok(goals)
    }

    #[instrument(skip(self, req))]
    pub async fn create_goal(&self, req: CreateGoal) -> Result<Goal> {
        let (Some(title), Some(raw_due_date), Some(user_id)) = (
            present(req.title),
            present(req.due_date),
            req.user_id.filter(|id| *id != 0),
        ) else {
            warn!("Goal creation rejected: missing fields");
            return Err(DomainError::validation(MISSING_GOAL_FIELDS).into());
        };

        let due_date = parse_due_date(&raw_due_date).ok_or_else(|| {
            warn!(due_date = %raw_due_date, "Goal creation rejected: bad DueDate");
            DomainError::validation("DueDate must be a valid date/time")
        })?;

        let goal = self
            .repository
            .insert_goal(NewGoal {
                title,
                description: req.description.unwrap_or_default(),
                due_date,
                user_id,
            })
            .await?;

        info!(goal_id = goal.id, user_id = goal.user_id, "Goal created");
        Ok(goal)
    }

    /// Idempotent: a missing row is still a success, and so is an id that
    /// cannot name any row. Any caller may delete any goal.
    #[instrument(skip(self))]
    pub async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        let Ok(goal_id) = goal_id.trim().parse::<i64>() else {
            debug!(goal_id, "Delete with non-integer id is a no-op");
            return Ok(());
        };
        let removed = self.repository.delete_goal(goal_id).await?;
        if removed == 0 {
            debug!(goal_id, "Delete matched no goal");
        } else {
            info!(goal_id, "Goal deleted");
        }
        Ok(())
    }
}

fn parse_id(raw: &str, what: &str) -> Result<i64, DomainError> {
    raw.trim().parse::<i64>().map_err(|_| {
        warn!(value = raw, field = what, "Rejected non-integer id");
        DomainError::validation(format!("{} must be an integer", what))
    })
}
