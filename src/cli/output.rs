use serde::Serialize;

use crate::model::task::{Priority, Task};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl From<&Task> for TaskJson {
    fn from(task: &Task) -> Self {
        TaskJson {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            priority: task.priority,
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

pub fn tasks_to_json(tasks: &[Task]) -> Vec<TaskJson> {
    tasks.iter().map(TaskJson::from).collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One-line summary: `[x] <id>  <text>  (<priority>[, due <date>])`
pub fn format_task_line(task: &Task) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut meta = task.priority.as_str().to_string();
    if let Some(due) = task.due_date {
        meta.push_str(&format!(", due {}", due.format("%Y-%m-%d")));
    }
    format!("{} {}  {}  ({})", check, task.id, task.text, meta)
}

/// Print tasks as text lines, or as a pretty JSON array
pub fn print_tasks(tasks: &[Task], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks_to_json(tasks))?);
    } else {
        for task in tasks {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

/// Print a single task as a text line or a JSON object
pub fn print_task(task: &Task, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&TaskJson::from(task))?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}
