// --------------------------------------------------
// Handles API endpoints related to task CRUD operations.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Toggle completion (is_completed and status move together)
// --------------------------------------------------

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{CreateTaskRequest, Task, TaskId, TaskStatus, UpdateTaskRequest};

pub(crate) fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("invalid id".to_string()))
}

fn require_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("title required".to_string()));
    }
    Ok(())
}

// Accepts RFC3339 or a bare "YYYY-MM-DD" (midnight at `offset`).
// Empty input means no due date.
pub(crate) fn parse_due_date(
    raw: Option<&str>,
    offset: FixedOffset,
) -> Result<Option<DateTime<FixedOffset>>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(Some)
        .ok_or_else(|| ApiError::BadRequest("invalid due_date".to_string()))
}

// -----------------------------
// GET /api/tasks/
// Returns all tasks in creation order
// -----------------------------
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let db = state.store.load()?;
    Ok(Json(db.tasks))
}

// -----------------------------
// GET /api/tasks/:id/
// -----------------------------
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let db = state.store.load()?;
    db.tasks
        .into_iter()
        .find(|t| t.id == id)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// -----------------------------
// POST /api/tasks/
// Creates a new task and saves it to the store
// -----------------------------
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_title(&input.title)?;
    let now = now_fixed_offset();
    let due_date = parse_due_date(input.due_date.as_deref(), *now.offset())?;

    let _guard = state.write_lock.lock().await;
    let mut db = state.store.load()?;

    let task = Task {
        id: db.next_id,
        title: input.title,
        description: input.description.unwrap_or_default(),
        priority: input.priority,
        status: TaskStatus::Todo,
        due_date,
        created_at: now,
        updated_at: now,
        is_completed: false,
    };

    db.next_id += 1;
    db.tasks.push(task.clone());
    state.store.save(&db)?;

    info!(id = task.id, priority = task.priority.as_str(), "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

// -----------------------------
// PUT /api/tasks/:id/
// Applies the fields present in the body. status and is_completed
// are taken as given, without reconciling one against the other.
// -----------------------------
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    if let Some(title) = &input.title {
        require_title(title)?;
    }
    let now = now_fixed_offset();
    let due_date = match &input.due_date {
        Some(raw) => Some(parse_due_date(raw.as_deref(), *now.offset())?),
        None => None,
    };

    let _guard = state.write_lock.lock().await;
    let mut db = state.store.load()?;

    let Some(t) = db.tasks.iter_mut().find(|t| t.id == id) else {
        return Err(ApiError::NotFound);
    };

    if let Some(title) = input.title {
        t.title = title;
    }
    if let Some(description) = input.description {
        t.description = description;
    }
    if let Some(priority) = input.priority {
        t.priority = priority;
    }
    if let Some(due_date) = due_date {
        t.due_date = due_date;
    }
    if let Some(status) = input.status {
        t.status = status;
    }
    if let Some(done) = input.is_completed {
        t.is_completed = done;
    }
    t.updated_at = now;

    let updated = t.clone();
    state.store.save(&db)?;

    info!(id, "task updated");
    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/tasks/:id/
// Removes a task permanently
// -----------------------------
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    let _guard = state.write_lock.lock().await;
    let mut db = state.store.load()?;

    let before = db.tasks.len();
    db.tasks.retain(|t| t.id != id);

    if db.tasks.len() == before {
        return Err(ApiError::NotFound);
    }

    state.store.save(&db)?;

    info!(id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// -----------------------------
// PATCH /api/tasks/:id/toggle_complete/
// Flips is_completed; status follows (completed <-> todo)
// -----------------------------
pub async fn toggle_complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;

    let _guard = state.write_lock.lock().await;
    let mut db = state.store.load()?;

    let Some(t) = db.tasks.iter_mut().find(|t| t.id == id) else {
        return Err(ApiError::NotFound);
    };

    t.is_completed = !t.is_completed;
    t.status = if t.is_completed {
        TaskStatus::Completed
    } else {
        TaskStatus::Todo
    };
    t.updated_at = now_fixed_offset();

    let updated = t.clone();
    state.store.save(&db)?;

    info!(id, is_completed = updated.is_completed, "task toggled");
    Ok(Json(updated))
}
