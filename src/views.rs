// --------------------------------------------------
// Terminal views over the task API.
//
// - Home: greeting, quick stats, five most recent tasks
// - Summary: counts, completion bar, breakdowns
// - Task manager: local task list plus the create/edit form
// --------------------------------------------------

use chrono::{Local, Timelike};
use colored::{Color, Colorize};

use crate::client::{validate_title, TaskApi};
use crate::error::{Action, ClientError};
use crate::models::{
    CreateTaskRequest, Priority, Task, TaskId, TaskStats, TaskStatus, UpdateTaskRequest,
};
use crate::stats::display_rate;

const RECENT_LIMIT: usize = 5;
const BAR_WIDTH: usize = 20;

pub fn priority_label(p: Priority) -> String {
    p.as_str().to_uppercase()
}

pub fn status_label(s: TaskStatus) -> String {
    s.as_str().replace('_', " ").to_uppercase()
}

pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Cyan,
    }
}

pub fn status_color(s: TaskStatus) -> Color {
    match s {
        TaskStatus::Completed => Color::Green,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::Todo => Color::Red,
    }
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning!"
    } else if hour < 17 {
        "Good afternoon!"
    } else {
        "Good evening!"
    }
}

pub fn render_task(task: &Task) -> String {
    let check = if task.is_completed { "[x]" } else { "[ ]" };
    let title = if task.is_completed {
        task.title.strikethrough().to_string()
    } else {
        task.title.bold().to_string()
    };
    let mut line = format!(
        "{check} #{} {title}  {}  {}",
        task.id,
        priority_label(task.priority).color(priority_color(task.priority)),
        status_label(task.status).color(status_color(task.status)),
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  Due: {}", due.format("%Y-%m-%d")));
    }
    if !task.description.is_empty() {
        line.push_str(&format!("\n      {}", task.description.dimmed()));
    }
    line
}

// One line per task, or a placeholder when there are none.
fn task_lines(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks yet.".to_string()];
    }
    tasks.iter().map(render_task).collect()
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn progress_bar(rate: f64) -> String {
    let filled = (display_rate(rate) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled).green(),
        "-".repeat(BAR_WIDTH - filled)
    )
}

/// Home dashboard snapshot.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub recent_tasks: Vec<Task>,
    pub stats: TaskStats,
}

impl HomeView {
    // Both requests go out together; neither depends on the other.
    pub async fn load(api: &TaskApi) -> Result<Self, ClientError> {
        let (tasks, stats) = tokio::try_join!(api.get_tasks(), api.get_stats())?;
        Ok(Self::from_parts(tasks, stats))
    }

    pub fn from_parts(mut tasks: Vec<Task>, stats: TaskStats) -> Self {
        tasks.truncate(RECENT_LIMIT);
        HomeView {
            recent_tasks: tasks,
            stats,
        }
    }

    pub fn render(&self, hour: u32) -> String {
        let mut lines = vec![
            "Tasks".bold().to_string(),
            greeting(hour).to_string(),
            String::new(),
            format!(
                "Total: {}   Completed: {}   Progress: {}%",
                self.stats.total_tasks,
                self.stats.completed_tasks.to_string().green(),
                display_rate(self.stats.completion_rate)
            ),
            String::new(),
            "Recent Tasks".bold().to_string(),
        ];
        lines.extend(task_lines(&self.recent_tasks));
        finish(lines)
    }

    pub fn render_now(&self) -> String {
        self.render(Local::now().hour())
    }
}

/// Summary screen over a stats snapshot.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub stats: TaskStats,
}

impl SummaryView {
    pub async fn load(api: &TaskApi) -> Result<Self, ClientError> {
        Ok(SummaryView {
            stats: api.get_stats().await?,
        })
    }

    pub fn render(&self) -> String {
        let s = &self.stats;
        let mut lines = vec![
            "TASK SUMMARY".bold().to_string(),
            format!(
                "Tasks: {}   Completed: {}   Incomplete: {}",
                s.total_tasks,
                s.completed_tasks.to_string().green(),
                s.incomplete_tasks.to_string().red()
            ),
            format!(
                "{} {}% Complete",
                progress_bar(s.completion_rate),
                display_rate(s.completion_rate)
            ),
            String::new(),
            "By priority".bold().to_string(),
        ];
        lines.extend(s.priority_breakdown.iter().map(|entry| {
            format!(
                "  {:<12} {}",
                priority_label(entry.priority).color(priority_color(entry.priority)),
                entry.count
            )
        }));

        lines.push(String::new());
        lines.push("By status".bold().to_string());
        lines.extend(s.status_breakdown.iter().map(|entry| {
            format!(
                "  {:<12} {}",
                status_label(entry.status).color(status_color(entry.status)),
                entry.count
            )
        }));
        finish(lines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Creating,
    Editing(TaskId),
}

/// Create/edit form state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub mode: EditMode,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        TaskForm {
            mode: EditMode::Creating,
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
        }
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(task: &Task) -> Self {
        TaskForm {
            mode: EditMode::Editing(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date.map(|d| d.to_rfc3339()),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn action(&self) -> Action {
        match self.mode {
            EditMode::Creating => Action::CreateTask,
            EditMode::Editing(_) => Action::UpdateTask,
        }
    }

    fn due_date(&self) -> Option<String> {
        self.due_date.clone().filter(|d| !d.trim().is_empty())
    }

    // Blank title stops here, before any request.
    pub async fn submit(&self, api: &TaskApi) -> Result<Task, ClientError> {
        validate_title(&self.title)?;
        match self.mode {
            EditMode::Creating => {
                let req = CreateTaskRequest {
                    title: self.title.clone(),
                    description: Some(self.description.clone()),
                    priority: self.priority,
                    due_date: self.due_date(),
                };
                api.create_task(&req).await
            }
            EditMode::Editing(id) => {
                let req = UpdateTaskRequest {
                    title: Some(self.title.clone()),
                    description: Some(self.description.clone()),
                    priority: Some(self.priority),
                    due_date: Some(self.due_date()),
                    ..Default::default()
                };
                api.update_task(id, &req).await
            }
        }
    }
}

/// Task manager list. Refresh swaps the whole snapshot; the result of a
/// single create/update/toggle/delete is folded in without refetching.
#[derive(Debug, Clone, Default)]
pub struct TaskManager {
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub async fn refresh(&mut self, api: &TaskApi) -> Result<(), ClientError> {
        self.tasks = api.get_tasks().await?;
        Ok(())
    }

    // The form is cleared only when the request succeeds.
    pub async fn submit(&mut self, api: &TaskApi, form: &mut TaskForm) -> Result<Task, ClientError> {
        let task = form.submit(api).await?;
        match form.mode {
            EditMode::Creating => self.apply_created(task.clone()),
            EditMode::Editing(_) => self.apply_updated(task.clone()),
        }
        form.reset();
        Ok(task)
    }

    pub async fn update(
        &mut self,
        api: &TaskApi,
        id: TaskId,
        req: &UpdateTaskRequest,
    ) -> Result<Task, ClientError> {
        let task = api.update_task(id, req).await?;
        self.apply_updated(task.clone());
        Ok(task)
    }

    pub async fn toggle(&mut self, api: &TaskApi, id: TaskId) -> Result<Task, ClientError> {
        let task = api.toggle_complete(id).await?;
        self.apply_updated(task.clone());
        Ok(task)
    }

    pub async fn delete(&mut self, api: &TaskApi, id: TaskId) -> Result<(), ClientError> {
        api.delete_task(id).await?;
        self.apply_deleted(id);
        Ok(())
    }

    fn apply_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    fn apply_updated(&mut self, task: Task) {
        self.tasks = self
            .tasks
            .iter()
            .map(|t| if t.id == task.id { task.clone() } else { t.clone() })
            .collect();
    }

    fn apply_deleted(&mut self, id: TaskId) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn render(&self) -> String {
        finish(task_lines(&self.tasks))
    }
}
