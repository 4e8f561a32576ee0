//! HTTP client for the task API.
//!
//! One async method per endpoint. Any non-success status or transport failure
//! comes back as [`ClientError`]; nothing is retried.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::models::{CreateTaskRequest, Task, TaskId, TaskStats, UpdateTaskRequest};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const EMPTY_TITLE_MESSAGE: &str = "Please enter a task title";

#[derive(Debug, Clone)]
pub struct TaskApi {
    http: Client,
    base_url: String,
}

impl TaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        TaskApi { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let resp = self.http.get(self.url("/tasks/")).send().await?;
        decode(resp).await
    }

    pub async fn get_task(&self, id: TaskId) -> Result<Task, ClientError> {
        let resp = self.http.get(self.url(&format!("/tasks/{id}/"))).send().await?;
        decode(resp).await
    }

    pub async fn create_task(&self, task: &CreateTaskRequest) -> Result<Task, ClientError> {
        validate_title(&task.title)?;
        let resp = self.http.post(self.url("/tasks/")).json(task).send().await?;
        decode(resp).await
    }

    pub async fn update_task(
        &self,
        id: TaskId,
        task: &UpdateTaskRequest,
    ) -> Result<Task, ClientError> {
        if let Some(title) = &task.title {
            validate_title(title)?;
        }
        let resp = self
            .http
            .put(self.url(&format!("/tasks/{id}/")))
            .json(task)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        debug!(id, "deleting task");
        let resp = self.http.delete(self.url(&format!("/tasks/{id}/"))).send().await?;
        check(resp).await.map(|_| ())
    }

    pub async fn toggle_complete(&self, id: TaskId) -> Result<Task, ClientError> {
        let resp = self
            .http
            .patch(self.url(&format!("/tasks/{id}/toggle_complete/")))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_stats(&self) -> Result<TaskStats, ClientError> {
        let resp = self.http.get(self.url("/tasks/stats/")).send().await?;
        decode(resp).await
    }
}

pub fn validate_title(title: &str) -> Result<(), ClientError> {
    if title.trim().is_empty() {
        return Err(ClientError::Validation(EMPTY_TITLE_MESSAGE.to_string()));
    }
    Ok(())
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    Ok(check(resp).await?.json::<T>().await?)
}
