//! Task scanning and toggling across notes.

use serde::Serialize;

use ovault_core::extract::parse_task_line;
use ovault_core::{Result, VaultError};

use crate::context::VaultContext;
use crate::index::list_notes;

/// Status filters for task listing. Exactly one flag set narrows to
/// that status; both or neither set excludes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub todo: bool,
    pub done: bool,
}

impl TaskFilter {
    fn admits(&self, is_done: bool) -> bool {
        match (self.todo, self.done) {
            (true, false) => !is_done,
            (false, true) => is_done,
            _ => true,
        }
    }
}

/// One task occurrence, identified by note path and 1-indexed line.
#[derive(Debug, Clone, Serialize)]
pub struct TaskItem {
    pub path: String,
    pub line: usize,
    pub status: char,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListing {
    pub total: usize,
    pub tasks: Vec<TaskItem>,
}

impl TaskListing {
    pub fn to_markdown(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks found.".to_string();
        }
        let mut lines = vec![format!("# Tasks ({} tasks found)", self.total)];
        for task in &self.tasks {
            lines.push(format!(
                "- [{}] {} ({}:{})",
                task.status, task.text, task.path, task.line
            ));
        }
        lines.join("\n")
    }
}

/// Scan every line of every matched note for checkbox tasks.
/// Unreadable notes are skipped.
pub fn list_tasks(
    ctx: &VaultContext,
    folder: Option<&str>,
    filter: TaskFilter,
) -> Result<TaskListing> {
    let notes = list_notes(ctx, folder)?;
    let mut tasks = Vec::new();
    for path in notes {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let rel = ctx.relative(&path);
        for (i, line) in content.lines().enumerate() {
            if let Some(task) = parse_task_line(line) {
                if !filter.admits(task.is_done()) {
                    continue;
                }
                tasks.push(TaskItem {
                    path: rel.clone(),
                    line: i + 1,
                    status: task.status,
                    text: task.text,
                });
            }
        }
    }
    Ok(TaskListing {
        total: tasks.len(),
        tasks,
    })
}

/// Outcome of a task toggle.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub path: String,
    pub line: usize,
    pub new_status: char,
}

impl ToggleOutcome {
    pub fn to_message(&self) -> String {
        format!(
            "Toggled task at {}:{} to [{}]",
            self.path, self.line, self.new_status
        )
    }
}

/// Flip the checkbox status of the task at a 1-indexed line, preserving
/// indent and text verbatim. A trailing newline in the original file is
/// preserved through the rewrite.
pub fn toggle_task(ctx: &VaultContext, path_raw: &str, line: usize) -> Result<ToggleOutcome> {
    let path = ctx.resolve_note(path_raw)?;
    if !path.is_file() {
        return Err(VaultError::NotFound(format!(
            "Note not found at '{path_raw}'."
        )));
    }
    let content = std::fs::read_to_string(&path)?;
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    if line == 0 {
        return Err(VaultError::InvalidInput(
            "Line numbers are 1-indexed.".to_string(),
        ));
    }
    if line > lines.len() {
        return Err(VaultError::InvalidInput(format!(
            "Line {line} exceeds file length ({} lines).",
            lines.len()
        )));
    }

    let task = parse_task_line(&lines[line - 1]).ok_or_else(|| {
        VaultError::InvalidInput(format!("Line {line} in '{path_raw}' is not a task."))
    })?;
    let new_status = task.toggled_status();
    lines[line - 1] = task.to_line(new_status);

    let mut output = lines.join("\n");
    if content.ends_with('\n') {
        output.push('\n');
    }
    std::fs::write(&path, output)?;

    Ok(ToggleOutcome {
        path: ctx.relative(&path),
        line,
        new_status,
    })
}
