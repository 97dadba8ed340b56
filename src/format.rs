//! Output formatting utilities for markdown and JSON.

use crate::board::TaskLocation;
use crate::board::query::{BoardStats, ListEntry, Projection, QueryResult};
use crate::types::{Column, Priority, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    #[serde(alias = "md")]
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Format a single task with its location as markdown.
pub fn format_task_markdown(location: &TaskLocation, today: NaiveDate) -> String {
    let task = &location.task;
    let mut md = String::new();

    md.push_str(&format!("## {} - {}\n", task.company, task.role));
    md.push_str(&format!("- **id**: `{}`\n", task.id));
    md.push_str(&format!(
        "- **status**: {} (#{})\n",
        location.column_title,
        location.index + 1
    ));
    md.push_str(&format!("- **priority**: {}\n", task.priority));

    if !task.due_date.is_empty() {
        match task.due_status(today) {
            Some(status) => md.push_str(&format!("- **due**: {} ({})\n", task.due_date, status)),
            None => md.push_str(&format!("- **due**: {}\n", task.due_date)),
        }
    }

    if !task.tags.is_empty() {
        md.push_str(&format!("- **tags**: {}\n", task.tags.join(", ")));
    }

    if !task.url.is_empty() {
        md.push_str(&format!("- **url**: {}\n", task.url));
    }

    if !task.notes.is_empty() {
        md.push_str("\n### Notes\n");
        md.push_str(&task.notes);
        md.push('\n');
    }

    md
}

/// Format board-mode columns; empty columns are listed with a placeholder.
pub fn format_board_markdown(columns: &[Column], today: NaiveDate) -> String {
    let mut md = String::new();

    for column in columns {
        md.push_str(&format!("## {} ({})\n\n", column.title, column.tasks.len()));
        if column.tasks.is_empty() {
            md.push_str("_empty_\n");
        }
        for task in &column.tasks {
            md.push_str(&format_task_short(task, today));
        }
        md.push('\n');
    }

    md
}

/// Format list-mode entries as a table.
pub fn format_list_markdown(entries: &[ListEntry], today: NaiveDate) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Applications ({})\n\n", entries.len()));
    if entries.is_empty() {
        md.push_str("_no matching applications_\n");
        return md;
    }

    md.push_str("| Company | Role | Status | Priority | Due | Id |\n");
    md.push_str("|---|---|---|---|---|---|\n");
    for entry in entries {
        let task = &entry.task;
        let due = task
            .due_status(today)
            .map(|s| s.to_string())
            .unwrap_or_else(|| task.due_date.clone());
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | `{}` |\n",
            task.company, task.role, entry.status_title, task.priority, due, task.id
        ));
    }

    md
}

pub fn format_stats_markdown(stats: &BoardStats) -> String {
    let mut parts = vec![format!("Total: **{}**", stats.total)];
    for entry in &stats.by_status {
        parts.push(format!("{}: **{}**", entry.status, entry.count));
    }
    format!("{}\n", parts.join(" | "))
}

pub fn format_query_markdown(result: &QueryResult, today: NaiveDate) -> String {
    let mut md = format_stats_markdown(&result.stats);
    md.push('\n');
    match &result.projection {
        Projection::Board { columns } => md.push_str(&format_board_markdown(columns, today)),
        Projection::List { tasks } => md.push_str(&format_list_markdown(tasks, today)),
    }
    md
}

/// Format a task in short form for column listings.
fn format_task_short(task: &Task, today: NaiveDate) -> String {
    let priority_marker = match task.priority {
        Priority::High => "!!! ",
        Priority::Medium => "",
        Priority::Low => "(low) ",
    };

    let due = task
        .due_status(today)
        .map(|s| format!(" - _{}_", s))
        .unwrap_or_default();

    let tags = if task.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", task.tags.join(", "))
    };

    format!(
        "- {}{} - {} `{}`{}{}\n",
        priority_marker, task.company, task.role, task.id, tags, due,
    )
}
