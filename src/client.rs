//! Typed HTTP client for the study-planner API.
//!
//! One request per call: no retries, no caching, no batching. A non-2xx
//! response becomes [`NetworkError::Status`] carrying the raw body text.

use crate::domain::models::{CreateGoal, Goal, OkResponse};
use crate::domain::user::{CreateUser, User};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("{body}")]
    Status { status: StatusCode, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Uses `API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, NetworkError> {
        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NetworkError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!(status = %status, body = %body, "API request failed");
            return Err(NetworkError::Status { status, body });
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_users(&self) -> Result<Vec<User>, NetworkError> {
        let users: Vec<User> = self.send(self.client.get(self.url("/users"))).await?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    #[instrument(skip(self, payload))]
    pub async fn add_user(&self, payload: &CreateUser) -> Result<User, NetworkError> {
        self.send(self.client.post(self.url("/add_user")).json(payload))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_goals(&self, user_id: i64) -> Result<Vec<Goal>, NetworkError> {
        let goals: Vec<Goal> = self
            .send(
                self.client
                    .get(self.url("/goals"))
                    .query(&[("userId", user_id)]),
            )
            .await?;
        debug!(user_id, count = goals.len(), "Fetched goals");
        Ok(goals)
    }

    #[instrument(skip(self, payload))]
    pub async fn add_goal(&self, payload: &CreateGoal) -> Result<Goal, NetworkError> {
        self.send(self.client.post(self.url("/goals")).json(payload))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_goal(&self, goal_id: i64) -> Result<OkResponse, NetworkError> {
        self.send(self.client.delete(self.url(&format!("/goals/{}", goal_id))))
            .await
    }
}
