use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};

use task_manager::app::{self, AppState};
use task_manager::client::TaskApi;
use task_manager::config::{self, ClientConfig, ServerConfig};
use task_manager::error::{Action, ClientError};
use task_manager::models::{Priority, TaskId, TaskStatus, UpdateTaskRequest};
use task_manager::store::JsonStore;
use task_manager::views::{render_task, HomeView, SummaryView, TaskForm, TaskManager};

#[derive(Parser)]
#[command(name = "task_manager")]
#[command(about = "Task manager API server and terminal client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    client: ClientConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the task API server
    Serve(ServerConfig),

    /// Dashboard: quick stats and recent tasks
    Home,

    /// List all tasks
    List,

    /// Show a single task
    Show { id: TaskId },

    /// Create a task
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// RFC3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// Edit a task; only the given fields change
    Edit {
        id: TaskId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// RFC3339 or YYYY-MM-DD
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a task
    Delete { id: TaskId },

    /// Flip a task between done and not done
    Toggle { id: TaskId },

    /// Completion rate and breakdowns
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = TaskApi::new(cli.client.api_url.clone());
    let mut manager = TaskManager::default();

    match cli.command {
        Commands::Serve(config) => serve(config).await,
        Commands::Home => {
            let home = report(Action::LoadTasks, HomeView::load(&api).await)?;
            print!("{}", home.render_now());
            Ok(())
        }
        Commands::List => {
            report(Action::LoadTasks, manager.refresh(&api).await)?;
            print!("{}", manager.render());
            Ok(())
        }
        Commands::Show { id } => {
            let task = report(Action::LoadTasks, api.get_task(id).await)?;
            println!("{}", render_task(&task));
            Ok(())
        }
        Commands::Add {
            title,
            description,
            priority,
            due,
        } => {
            let mut form = TaskForm {
                title,
                description,
                priority,
                due_date: due,
                ..TaskForm::new()
            };
            let action = form.action();
            let task = report(action, manager.submit(&api, &mut form).await)?;
            println!("{} {}", "Created".green(), render_task(&task));
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            description,
            priority,
            status,
            due,
            clear_due,
        } => {
            let req = UpdateTaskRequest {
                title,
                description,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                status,
                is_completed: None,
            };
            let task = report(Action::UpdateTask, manager.update(&api, id, &req).await)?;
            println!("{} {}", "Updated".green(), render_task(&task));
            Ok(())
        }
        Commands::Delete { id } => {
            report(Action::DeleteTask, manager.delete(&api, id).await)?;
            println!("{} #{id}", "Deleted".green());
            Ok(())
        }
        Commands::Toggle { id } => {
            let task = report(Action::UpdateTask, manager.toggle(&api, id).await)?;
            println!("{}", render_task(&task));
            Ok(())
        }
        Commands::Stats => {
            let summary = report(Action::LoadStats, SummaryView::load(&api).await)?;
            print!("{}", summary.render());
            Ok(())
        }
    }
}

// Log the underlying failure, surface only the action's notification.
fn report<T>(action: Action, result: Result<T, ClientError>) -> anyhow::Result<T> {
    result.map_err(|e| {
        error!(?action, "{}", e);
        anyhow::anyhow!(e.user_message(action))
    })
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = JsonStore::new(config.db_path.clone());
    let app = app::router(AppState::new(store.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("bind {} failed", config.bind))?;

    info!("Server running at http://{}", config.bind);
    info!("API base:     http://{}/api", config.bind);
    info!("Store file:   {}", store.path().display());

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
