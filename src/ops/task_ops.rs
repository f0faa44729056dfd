use crate::model::filter::Filter;
use crate::model::task::{Task, TaskPatch};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim submitted text. Returns `None` for blank input, which callers
/// ignore without creating a task.
pub fn normalize_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

// ---------------------------------------------------------------------------
// Single-task transforms
// ---------------------------------------------------------------------------

/// Merge `patch` into `task`. Unset fields are left untouched; a blank
/// replacement text is ignored.
pub fn apply_patch(task: &mut Task, patch: &TaskPatch) {
    if let Some(text) = patch.text.as_deref().and_then(normalize_text) {
        task.text = text.to_string();
    }
    if let Some(completed) = patch.completed {
        task.completed = completed;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
}

// ---------------------------------------------------------------------------
// Collection operations
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}

/// Flip `completed` on the matching task. Returns false if `id` is absent.
pub fn toggle_task(tasks: &mut [Task], id: &str) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            task.completed = !task.completed;
            true
        }
        None => false,
    }
}

/// Remove the matching task, preserving the order of the rest.
pub fn remove_task(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    tasks.len() != before
}

/// Apply `patch` to the matching task. Returns false if `id` is absent.
pub fn update_task(tasks: &mut [Task], id: &str, patch: &TaskPatch) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            apply_patch(task, patch);
            true
        }
        None => false,
    }
}

/// Snapshot of the tasks selected by `filter`, in collection order.
pub fn filtered_view(tasks: &[Task], filter: Filter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Counts shown next to the filter tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn for_filter(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }
}

pub fn count_tasks(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskCounts {
        all: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample_tasks() -> Vec<Task> {
        let mut done = Task::new("2", "Walk dog");
        done.completed = true;
        let mut due = Task::new("3", "File taxes");
        due.priority = Priority::High;
        due.due_date = NaiveDate::from_ymd_opt(2025, 4, 15);
        vec![Task::new("1", "Buy milk"), done, due]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn normalize_text_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  Buy milk \n"), Some("Buy milk"));
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text(" \t "), None);
    }

    #[test]
    fn apply_patch_priority_only() {
        let mut tasks = sample_tasks();
        let before = tasks[2].clone();
        apply_patch(&mut tasks[2], &TaskPatch::priority(Priority::Low));
        assert_eq!(tasks[2].priority, Priority::Low);
        assert_eq!(tasks[2].text, before.text);
        assert_eq!(tasks[2].completed, before.completed);
        assert_eq!(tasks[2].due_date, before.due_date);
    }

    #[test]
    fn apply_patch_clears_and_sets_due_date() {
        let mut task = sample_tasks().remove(2);
        apply_patch(&mut task, &TaskPatch::due_date(None));
        assert!(task.due_date.is_none());

        let date = NaiveDate::from_ymd_opt(2026, 1, 2);
        apply_patch(&mut task, &TaskPatch::due_date(date));
        assert_eq!(task.due_date, date);
    }

    #[test]
    fn apply_patch_ignores_blank_text() {
        let mut task = Task::new("1", "Buy milk");
        apply_patch(&mut task, &TaskPatch::text("   "));
        assert_eq!(task.text, "Buy milk");
        apply_patch(&mut task, &TaskPatch::text("  Buy oat milk "));
        assert_eq!(task.text, "Buy oat milk");
    }

    #[test]
    fn apply_patch_multiple_fields() {
        let mut task = Task::new("1", "Buy milk");
        let patch = TaskPatch {
            text: Some("Buy bread".into()),
            completed: Some(true),
            priority: Some(Priority::High),
            due_date: None,
        };
        apply_patch(&mut task, &patch);
        assert_eq!(task.text, "Buy bread");
        assert!(task.completed);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn toggle_missing_is_noop() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert!(!toggle_task(&mut tasks, "99"));
        assert_eq!(tasks, before);
    }

    #[test]
    fn toggle_only_touches_match() {
        let mut tasks = sample_tasks();
        assert!(toggle_task(&mut tasks, "1"));
        assert!(tasks[0].completed);
        assert!(tasks[1].completed);
        assert!(!tasks[2].completed);
        assert_eq!(ids(&tasks), vec!["1", "2", "3"]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut tasks = sample_tasks();
        assert!(remove_task(&mut tasks, "2"));
        assert_eq!(ids(&tasks), vec!["1", "3"]);
        assert!(!remove_task(&mut tasks, "2"));
    }

    #[test]
    fn update_missing_is_noop() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert!(!update_task(&mut tasks, "nope", &TaskPatch::completed(true)));
        assert_eq!(tasks, before);
    }

    #[test]
    fn filtered_views() {
        let tasks = sample_tasks();
        assert_eq!(ids(&filtered_view(&tasks, Filter::All)), vec!["1", "2", "3"]);
        assert_eq!(ids(&filtered_view(&tasks, Filter::Active)), vec!["1", "3"]);
        assert_eq!(ids(&filtered_view(&tasks, Filter::Completed)), vec!["2"]);
    }

    #[test]
    fn counts() {
        let counts = count_tasks(&sample_tasks());
        assert_eq!(
            counts,
            TaskCounts {
                all: 3,
                active: 2,
                completed: 1
            }
        );
        assert_eq!(counts.for_filter(Filter::Active), 2);
    }
}
