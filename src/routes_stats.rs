use axum::{extract::State, Json};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::TaskStats;
use crate::stats;

// -----------------------------
// GET /api/tasks/stats/
// Recomputed from the full store on every call
// -----------------------------
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<TaskStats>, ApiError> {
    let db = state.store.load()?;
    let stats = stats::aggregate(&db.tasks);
    debug!(
        total = stats.total_tasks,
        completed = stats.completed_tasks,
        "stats computed"
    );
    Ok(Json(stats))
}
