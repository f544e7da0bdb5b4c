//! task-cli - terminal client for the Task Tracker API
//!
//! Lists, inspects and edits tasks through the same client and view-model
//! a front end would use.

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use task_tracker::api::TaskRequest;
use task_tracker::client::{
    CategoryFilter, ClientError, SortKey, StatusFilter, TaskBoard, TaskClient, ViewParams,
};
use task_tracker::domain::{Task, TaskId, TaskStatus};

/// task-cli - manage tasks from the terminal
#[derive(Parser, Debug)]
#[command(name = "task-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the task API
    #[arg(
        long,
        global = true,
        env = "TASK_API_URL",
        default_value = "http://localhost:8080/api"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List tasks, optionally searched, filtered and sorted
    List {
        /// Case-insensitive text to find in title or description
        #[arg(long, default_value = "")]
        search: String,

        /// TODO, IN_PROGRESS, DONE or ALL
        #[arg(long, default_value = "ALL")]
        status: StatusFilter,

        /// Exact category, or ALL
        #[arg(long, default_value = "ALL")]
        category: CategoryFilter,

        /// status, due-date or title
        #[arg(long, default_value = "due-date")]
        sort: SortKey,
    },

    /// List the categories in use
    Categories,

    /// Show one task
    Show {
        /// Task ID
        id: i64,
    },

    /// Create a task
    Add(TaskFields),

    /// Replace a task; fields not given are cleared
    Edit {
        /// Task ID
        id: i64,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
}

#[derive(Args, Debug)]
struct TaskFields {
    /// Title (1-100 characters)
    title: String,

    /// Description (up to 500 characters)
    #[arg(short, long)]
    description: Option<String>,

    /// TODO, IN_PROGRESS or DONE (default TODO)
    #[arg(short, long)]
    status: Option<TaskStatus>,

    /// Free-text category
    #[arg(short, long)]
    category: Option<String>,

    /// Due date, YYYY-MM-DD
    #[arg(long)]
    due: Option<NaiveDate>,
}

impl From<TaskFields> for TaskRequest {
    fn from(fields: TaskFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            status: fields.status,
            category: fields.category,
            due_date: fields.due,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Tracing is opt-in via RUST_LOG so it never mixes with command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let client = TaskClient::new(cli.base_url);
    tracing::debug!(base_url = client.base_url(), "Using task API");

    match cli.command {
        Commands::List {
            search,
            status,
            category,
            sort,
        } => {
            let mut board = TaskBoard::new(client);
            board.set_params(ViewParams {
                search,
                status,
                category,
                sort,
            });
            board.reload().await?;

            let visible = board.visible();
            if visible.is_empty() {
                println!("{}", empty_message(board.params()));
            }
            for task in &visible {
                println!("{}", list_line(task, TaskBoard::is_overdue(task)));
            }
        }
        Commands::Categories => {
            let mut board = TaskBoard::new(client);
            board.reload().await?;
            for category in board.categories() {
                println!("{category}");
            }
        }
        Commands::Show { id } => {
            let task = client.get(TaskId::new(id)).await?;
            print_task(&task);
        }
        Commands::Add(fields) => {
            let task = client.create(&TaskRequest::from(fields)).await?;
            println!("Created task {}", task.id);
            print_task(&task);
        }
        Commands::Edit { id, fields } => {
            let task = client
                .update(TaskId::new(id), &TaskRequest::from(fields))
                .await?;
            println!("Updated task {}", task.id);
            print_task(&task);
        }
        Commands::Delete { id } => {
            client.delete(TaskId::new(id)).await?;
            println!("Deleted task {id}");
        }
    }

    Ok(())
}

fn empty_message(params: &ViewParams) -> &'static str {
    if *params == ViewParams::default() {
        "No tasks."
    } else {
        "No tasks match the current search and filters."
    }
}

fn list_line(task: &Task, overdue: bool) -> String {
    let due = task
        .due_date
        .map_or_else(|| "-".to_string(), |due| due.to_string());
    let mut line = format!(
        "{:>5}  {:<11}  {:<10}  {}",
        task.id,
        task.status.as_str(),
        due,
        task.title
    );
    if let Some(category) = &task.category {
        line.push_str(&format!(" [{category}]"));
    }
    if overdue {
        line.push_str("  (overdue)");
    }
    line
}

fn print_task(task: &Task) {
    println!("id:          {}", task.id);
    println!("title:       {}", task.title);
    println!("status:      {}", task.status);
    if let Some(description) = &task.description {
        println!("description: {description}");
    }
    if let Some(category) = &task.category {
        println!("category:    {category}");
    }
    if let Some(due) = task.due_date {
        let marker = if TaskBoard::is_overdue(task) {
            " (overdue)"
        } else {
            ""
        };
        println!("due:         {due}{marker}");
    }
    println!("created:     {}", task.created_at);
    println!("updated:     {}", task.updated_at);
}
