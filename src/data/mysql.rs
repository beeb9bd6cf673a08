use crate::domain::models::{Goal, NewGoal};
use crate::domain::repository::{GoalRepository, UserRepository};
use crate::domain::user::{NewUser, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, instrument};

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: i64,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.user_id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, FromRow)]
struct GoalRow {
    goal_id: i64,
    title: String,
    description: Option<String>,
    due_date: NaiveDateTime,
    user_id: i64,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Goal {
            id: row.goal_id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            due_date: row.due_date,
            user_id: row.user_id,
        }
    }
}

fn inserted_id(raw: u64) -> Result<i64> {
    i64::try_from(raw).context("store returned an out-of-range insert id")
}

#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT UserID AS user_id, Name AS name, Email AS email FROM `User` ORDER BY UserID",
        )
        .fetch_all(&self.pool)
        .await
        .context("select users")?;
        debug!(count = rows.len(), "Users fetched");
        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO `User` (Name, Email, Password) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .context("insert user")?;
        let id = inserted_id(result.last_insert_id())?;
        debug!(user_id = id, "User inserted");
        Ok(User {
            id,
            name: user.name,
            email: user.email,
        })
    }
}

#[derive(Clone)]
pub struct MySqlGoalRepository {
    pool: MySqlPool,
}

impl MySqlGoalRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for MySqlGoalRepository {
    #[instrument(skip(self))]
    async fn list_goals_by_owner(&self, owner_id: i64) -> Result<Vec<Goal>> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            "SELECT GoalID AS goal_id, Title AS title, Description AS description, \
             DueDate AS due_date, UserID AS user_id FROM `Goal` WHERE UserID = ?",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("select goals by owner")?;
        debug!(owner_id, count = rows.len(), "Goals fetched");
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    #[instrument(skip(self, goal), fields(user_id = goal.user_id))]
    async fn insert_goal(&self, goal: NewGoal) -> Result<Goal> {
        let result = sqlx::query(
            "INSERT INTO `Goal` (Title, Description, DueDate, UserID) VALUES (?, ?, ?, ?)",
        )
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.due_date)
        .bind(goal.user_id)
        .execute(&self.pool)
        .await
        .context("insert goal")?;
        let id = inserted_id(result.last_insert_id())?;
        debug!(goal_id = id, "Goal inserted");
        Ok(Goal {
            id,
            title: goal.title,
            description: goal.description,
            due_date: goal.due_date,
            user_id: goal.user_id,
        })
    }

    #[instrument(skip(self))]
    async fn delete_goal(&self, goal_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM `Goal` WHERE GoalID = ?")
            .bind(goal_id)
            .execute(&self.pool)
            .await
            .context("delete goal")?;
        debug!(goal_id, rows = result.rows_affected(), "Goal delete executed");
        Ok(result.rows_affected())
    }
}
