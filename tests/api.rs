//! End-to-end tests: the router on an ephemeral port, driven through `TaskApi`.

use task_manager::app::{router, AppState};
use task_manager::client::TaskApi;
use task_manager::error::{Action, ClientError};
use task_manager::models::{CreateTaskRequest, Priority, TaskStatus, UpdateTaskRequest};
use task_manager::store::JsonStore;
use task_manager::views::{EditMode, HomeView, TaskForm, TaskManager};
use tempfile::TempDir;

struct TestServer {
    api: TaskApi,
    base: String,
    _dir: TempDir,
}

async fn start() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path().join("db.json"));
    let app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = format!("http://{addr}");
    TestServer {
        api: TaskApi::new(format!("{base}/api")),
        base,
        _dir: dir,
    }
}

fn new_task(title: &str, priority: Priority) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.into(),
        priority,
        ..Default::default()
    }
}

#[tokio::test]
async fn create_list_get_delete() {
    let srv = start().await;
    let api = &srv.api;

    assert!(api.get_tasks().await.unwrap().is_empty());

    let a = api.create_task(&new_task("write report", Priority::High)).await.unwrap();
    let b = api.create_task(&new_task("buy milk", Priority::Low)).await.unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
    assert_eq!(a.status, TaskStatus::Todo);
    assert!(!a.is_completed);
    assert_eq!(a.description, "");
    assert!(a.due_date.is_none());

    let all = api.get_tasks().await.unwrap();
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);

    assert_eq!(api.get_task(2).await.unwrap().title, "buy milk");

    api.delete_task(1).await.unwrap();
    assert_eq!(api.get_tasks().await.unwrap().len(), 1);

    // ids are never reused
    let c = api.create_task(&new_task("again", Priority::Medium)).await.unwrap();
    assert_eq!(c.id, 3);
}

#[tokio::test]
async fn missing_task_is_a_status_error() {
    let srv = start().await;
    let err = srv.api.get_task(99).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
    assert_eq!(err.user_message(Action::LoadTasks), "Failed to load tasks");

    assert!(matches!(
        srv.api.delete_task(99).await,
        Err(ClientError::Status { status: 404, .. })
    ));
    assert!(matches!(
        srv.api.toggle_complete(99).await,
        Err(ClientError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn server_rejects_blank_title_and_bad_dates() {
    let srv = start().await;
    let http = reqwest::Client::new();

    let resp = http
        .post(format!("{}/api/tasks/", srv.base))
        .json(&serde_json::json!({ "title": "  ", "priority": "low" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "title required");

    let resp = http
        .post(format!("{}/api/tasks/", srv.base))
        .json(&serde_json::json!({ "title": "x", "priority": "low", "due_date": "soon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = http
        .get(format!("{}/api/tasks/abc/", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn create_returns_201_and_delete_204() {
    let srv = start().await;
    let http = reqwest::Client::new();

    let resp = http
        .post(format!("{}/api/tasks/", srv.base))
        .json(&serde_json::json!({ "title": "x", "priority": "high", "due_date": "2025-06-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let task: serde_json::Value = resp.json().await.unwrap();
    assert!(task["due_date"].as_str().unwrap().starts_with("2025-06-01T00:00:00"));
    for field in [
        "id", "title", "description", "priority", "status", "due_date", "created_at",
        "updated_at", "is_completed",
    ] {
        assert!(task.get(field).is_some(), "missing {field}");
    }

    let resp = http
        .delete(format!("{}/api/tasks/1/", srv.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn partial_update_leaves_other_fields() {
    let srv = start().await;
    let api = &srv.api;
    let created = api
        .create_task(&CreateTaskRequest {
            title: "draft".into(),
            description: Some("first pass".into()),
            priority: Priority::Low,
            due_date: Some("2025-06-01T12:00:00+00:00".into()),
        })
        .await
        .unwrap();

    let updated = api
        .update_task(
            created.id,
            &UpdateTaskRequest {
                priority: Some(Priority::High),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.title, "draft");
    assert_eq!(updated.description, "first pass");
    assert!(updated.due_date.is_some());
    assert!(updated.updated_at >= created.updated_at);

    let cleared = api
        .update_task(
            created.id,
            &UpdateTaskRequest {
                due_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.due_date.is_none());
}

#[tokio::test]
async fn update_does_not_reconcile_status_and_flag() {
    let srv = start().await;
    let api = &srv.api;
    let t = api.create_task(&new_task("odd", Priority::Medium)).await.unwrap();

    let t = api
        .update_task(
            t.id,
            &UpdateTaskRequest {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(t.status, TaskStatus::Completed);
    assert!(!t.is_completed);

    // stats follow the flag
    let stats = api.get_stats().await.unwrap();
    assert_eq!(stats.completed_tasks, 0);
    assert_eq!(stats.status_count(TaskStatus::Completed), 1);
}

#[tokio::test]
async fn toggle_keeps_status_in_step() {
    let srv = start().await;
    let api = &srv.api;
    let t = api.create_task(&new_task("flip", Priority::Medium)).await.unwrap();

    let on = api.toggle_complete(t.id).await.unwrap();
    assert!(on.is_completed);
    assert_eq!(on.status, TaskStatus::Completed);
    assert!(on.updated_at >= t.updated_at);
    assert_eq!(on.created_at, t.created_at);

    let off = api.toggle_complete(t.id).await.unwrap();
    assert!(!off.is_completed);
    assert_eq!(off.status, TaskStatus::Todo);
    assert!(off.updated_at >= on.updated_at);
}

#[tokio::test]
async fn stats_over_the_store() {
    let srv = start().await;
    let api = &srv.api;

    let empty = api.get_stats().await.unwrap();
    assert_eq!(empty.total_tasks, 0);
    assert_eq!(empty.completion_rate, 0.0);
    assert!(empty.priority_breakdown.is_empty());

    for (title, p) in [("a", Priority::High), ("b", Priority::High), ("c", Priority::Medium), ("d", Priority::Medium)] {
        api.create_task(&new_task(title, p)).await.unwrap();
    }
    for id in [1, 2, 3] {
        api.toggle_complete(id).await.unwrap();
    }

    let stats = api.get_stats().await.unwrap();
    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.completed_tasks, 3);
    assert_eq!(stats.incomplete_tasks, 1);
    assert_eq!(stats.completion_rate, 75.0);
    assert_eq!(stats.priority_count(Priority::High), 2);
    assert_eq!(stats.priority_count(Priority::Medium), 2);
    assert_eq!(stats.priority_count(Priority::Low), 0);
    assert_eq!(stats.priority_breakdown.len(), 2);
    assert_eq!(stats.status_count(TaskStatus::Completed), 3);
    assert_eq!(stats.status_count(TaskStatus::Todo), 1);
}

#[tokio::test]
async fn home_view_loads_both_in_one_go() {
    let srv = start().await;
    for i in 0..7 {
        srv.api
            .create_task(&new_task(&format!("task {i}"), Priority::Low))
            .await
            .unwrap();
    }
    let home = HomeView::load(&srv.api).await.unwrap();
    assert_eq!(home.recent_tasks.len(), 5);
    assert_eq!(home.stats.total_tasks, 7);
}

#[tokio::test]
async fn form_and_manager_flow() {
    let srv = start().await;
    let api = &srv.api;
    let mut manager = TaskManager::default();

    let mut form = TaskForm::new();
    form.title = "plan trip".into();
    form.priority = Priority::High;
    form.due_date = Some(String::new());
    let created = manager.submit(api, &mut form).await.unwrap();
    assert!(created.due_date.is_none());
    assert_eq!(form, TaskForm::default());
    assert_eq!(manager.tasks()[0].id, created.id);

    let mut form = TaskForm::edit(&created);
    assert_eq!(form.mode, EditMode::Editing(created.id));
    form.title = "plan long trip".into();
    manager.submit(api, &mut form).await.unwrap();
    assert_eq!(manager.tasks()[0].title, "plan long trip");
    assert_eq!(form.mode, EditMode::Creating);

    let toggled = manager.toggle(api, created.id).await.unwrap();
    assert!(manager.tasks()[0].is_completed);
    assert_eq!(manager.tasks()[0].updated_at, toggled.updated_at);

    let started = UpdateTaskRequest {
        status: Some(TaskStatus::InProgress),
        ..Default::default()
    };
    manager.update(api, created.id, &started).await.unwrap();
    assert_eq!(manager.tasks()[0].status, TaskStatus::InProgress);

    manager.refresh(api).await.unwrap();
    assert_eq!(manager.tasks().len(), 1);
    assert_eq!(manager.tasks()[0].priority, Priority::High);

    manager.delete(api, created.id).await.unwrap();
    assert!(manager.tasks().is_empty());
    assert!(api.get_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_submit_keeps_the_form() {
    let srv = start().await;
    let mut manager = TaskManager::default();

    let mut form = TaskForm::edit(
        &srv.api.create_task(&new_task("gone soon", Priority::Low)).await.unwrap(),
    );
    srv.api.delete_task(1).await.unwrap();

    form.title = "still here".into();
    let err = manager.submit(&srv.api, &mut form).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
    assert_eq!(form.title, "still here");
    assert_eq!(form.mode, EditMode::Editing(1));
    assert!(manager.tasks().is_empty());
}

#[tokio::test]
async fn unreachable_server_maps_to_notification() {
    let api = TaskApi::new("http://127.0.0.1:9/api");
    let err = api.get_tasks().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(err.user_message(Action::LoadTasks), "Failed to load tasks");
}

#[tokio::test]
async fn health() {
    let srv = start().await;
    let resp = reqwest::get(format!("{}/health", srv.base)).await.unwrap();
    assert_eq!(resp.status(), 200);
}
