use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Router,
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::routes_stats;
use crate::routes_tasks;
use crate::store::JsonStore;

#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    // serializes load -> modify -> save cycles on the store file
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: JsonStore) -> Self {
        AppState {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // stats (static segment wins over :id)
        .route("/tasks/stats/", get(routes_stats::get_stats))
        // tasks
        .route("/tasks/", get(routes_tasks::list_tasks).post(routes_tasks::create_task))
        .route(
            "/tasks/:id/",
            get(routes_tasks::get_task)
                .put(routes_tasks::update_task)
                .delete(routes_tasks::delete_task),
        )
        .route("/tasks/:id/toggle_complete/", patch(routes_tasks::toggle_complete));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
