//! Error types for the task store, the HTTP handlers and the API client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Failures reading or writing the JSON store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("task not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(e) => {
                error!("store failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Errors returned by [`crate::client::TaskApi`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally, no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Transport failure or undecodable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// User actions that can fail, each with its fixed notification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadTasks,
    LoadStats,
    CreateTask,
    UpdateTask,
    DeleteTask,
}

impl Action {
    pub fn failure_message(self) -> &'static str {
        match self {
            Action::LoadTasks => "Failed to load tasks",
            Action::LoadStats => "Failed to load statistics",
            Action::CreateTask => "Failed to create a task",
            Action::UpdateTask => "Failed to update task",
            Action::DeleteTask => "Failed to delete task",
        }
    }
}

impl ClientError {
    /// Text shown to the user. Validation keeps its own message, everything
    /// else collapses to the action's generic notification.
    pub fn user_message(&self, action: Action) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            _ => action.failure_message().to_string(),
        }
    }
}
