//! Task management commands.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::Subcommand;
use focusly_core::storage::{Database, Priority, TaskFilter, TaskSort};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Deadline, RFC 3339 (2024-06-01T17:00:00Z) or a date (2024-06-01)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    List {
        /// Filter: all, pending, completed or high-priority
        #[arg(long, default_value = "all")]
        filter: String,
        /// Sort: created, due or priority
        #[arg(long, default_value = "created")]
        sort: String,
    },
    /// Toggle a task between done and pending
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },
    /// Add a subtask
    SubAdd {
        /// Parent task ID
        task_id: String,
        /// Subtask title
        title: String,
    },
    /// Toggle a subtask between done and pending
    SubDone {
        /// Parent task ID
        task_id: String,
        /// Subtask ID
        subtask_id: String,
    },
    /// Pending tasks whose deadline falls inside the window
    Due {
        /// Window in hours
        #[arg(long, default_value = "24")]
        hours: i64,
        /// Also send a deadline notification per task found
        #[arg(long)]
        notify: bool,
    },
}

/// Accepts a full RFC 3339 timestamp or a bare date, which is taken to mean
/// end of that day.
fn parse_due(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("cannot parse deadline: {raw}"))?;
    let dt = date.and_hms_opt(23, 59, 59).ok_or("invalid deadline")?;
    Ok(dt.and_utc())
}

fn parse_filter(raw: &str) -> Result<TaskFilter, String> {
    match raw {
        "all" => Ok(TaskFilter::All),
        "pending" => Ok(TaskFilter::Pending),
        "completed" => Ok(TaskFilter::Completed),
        "high-priority" => Ok(TaskFilter::HighPriority),
        other => Err(format!("unknown filter: {other}")),
    }
}

fn parse_sort(raw: &str) -> Result<TaskSort, String> {
    match raw {
        "created" => Ok(TaskSort::Created),
        "due" => Ok(TaskSort::Due),
        "priority" => Ok(TaskSort::Priority),
        other => Err(format!("unknown sort: {other}")),
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut snapshot = db.load_snapshot()?;
    let now = Utc::now();

    match action {
        TaskAction::Add { title, description, priority, due } => {
            let priority: Priority = priority.parse()?;
            let due = due.as_deref().map(parse_due).transpose()?;
            let task = snapshot.add_task(&title, description.as_deref(), priority, due, now)?;
            db.save_snapshot(&snapshot)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { filter, sort } => {
            let view = snapshot.tasks_view(parse_filter(&filter)?, parse_sort(&sort)?);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        TaskAction::Done { id } => {
            let completed = snapshot
                .toggle_task(&id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            db.save_snapshot(&snapshot)?;
            let task = snapshot.task(&id).ok_or_else(|| format!("task not found: {id}"))?;
            println!(
                "Task {} is now {} ({}% complete)",
                id,
                if completed { "done" } else { "pending" },
                task.completion_percentage()
            );
        }
        TaskAction::Rm { id } => {
            if !snapshot.remove_task(&id) {
                return Err(format!("task not found: {id}").into());
            }
            db.save_snapshot(&snapshot)?;
            println!("Task deleted: {id}");
        }
        TaskAction::SubAdd { task_id, title } => {
            let subtask = snapshot
                .add_subtask(&task_id, &title)
                .ok_or_else(|| format!("task not found: {task_id}"))?;
            db.save_snapshot(&snapshot)?;
            println!("{}", serde_json::to_string_pretty(&subtask)?);
        }
        TaskAction::SubDone { task_id, subtask_id } => {
            let completed = snapshot
                .toggle_subtask(&task_id, &subtask_id)
                .ok_or_else(|| format!("subtask not found: {task_id}/{subtask_id}"))?;
            db.save_snapshot(&snapshot)?;
            let task = snapshot
                .task(&task_id)
                .ok_or_else(|| format!("task not found: {task_id}"))?;
            println!(
                "Subtask {} is now {} ({}% of the task complete)",
                subtask_id,
                if completed { "done" } else { "pending" },
                task.completion_percentage()
            );
        }
        TaskAction::Due { hours, notify } => {
            let due = snapshot.due_soon(now, Duration::hours(hours));
            println!("{}", serde_json::to_string_pretty(&due)?);
            if notify && snapshot.settings.notifications.task_deadlines {
                let mut notifier = super::notifier_from_settings(&db);
                for task in &due {
                    notifier.notify_task_deadline(&task.title);
                }
            }
        }
    }
    Ok(())
}
