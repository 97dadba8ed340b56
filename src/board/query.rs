//! Filtered views and aggregate counts over a board.
//!
//! Everything here is a pure function of `(board, query)`; nothing mutates
//! the board or keeps state between calls.

use crate::types::{ACCEPTED_STATUS, Board, Column, OFFER_STATUS, Priority, Task};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the projection is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Board,
    List,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "board" => Ok(ViewMode::Board),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode: {}", other)),
        }
    }
}

/// Status criterion: every column, or the column with this title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Title(String),
}

impl StatusFilter {
    fn accepts(&self, title: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Title(t) => t == title,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Title(s.to_string()))
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(f: StatusFilter) -> Self {
        f.to_string()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Title(t) => f.write_str(t),
        }
    }
}

/// Priority criterion: any priority, or exactly this one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PriorityFilter::All);
        }
        Priority::parse(s)
            .map(PriorityFilter::Only)
            .ok_or_else(|| format!("unknown priority: {}", s))
    }
}

impl TryFrom<String> for PriorityFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PriorityFilter> for String {
    fn from(f: PriorityFilter) -> Self {
        match f {
            PriorityFilter::All => "all".to_string(),
            PriorityFilter::Only(p) => p.as_str().to_string(),
        }
    }
}

/// Search and filter criteria for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub text: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub mode: ViewMode,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A task in list mode, tagged with its column's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    #[serde(flatten)]
    pub task: Task,
    pub status_title: String,
}

/// The filtered view handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Projection {
    /// Columns in board order; with a status filter, only the matching column.
    Board { columns: Vec<Column> },
    /// All matching tasks flattened in column-then-position order.
    List { tasks: Vec<ListEntry> },
}

impl Projection {
    pub fn task_count(&self) -> usize {
        match self {
            Projection::Board { columns } => columns.iter().map(|c| c.tasks.len()).sum(),
            Projection::List { tasks } => tasks.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Counts over the whole board, independent of any filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub offers: usize,
    pub accepted: usize,
}

impl BoardStats {
    pub fn count_for(&self, status: &str) -> usize {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub projection: Projection,
    pub stats: BoardStats,
}

/// Compute the projection and stats for one render.
pub fn run(board: &Board, query: &Query) -> QueryResult {
    QueryResult {
        projection: project(board, query),
        stats: stats(board),
    }
}

pub fn project(board: &Board, query: &Query) -> Projection {
    let needle = query.text.trim().to_lowercase();
    let keep = |task: &Task| matches_priority(task, query.priority) && matches_text(task, &needle);

    match query.mode {
        ViewMode::Board => Projection::Board {
            columns: board
                .columns()
                .iter()
                .filter(|c| query.status.accepts(&c.title))
                .map(|c| Column {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    tasks: c.tasks.iter().filter(|t| keep(t)).cloned().collect(),
                })
                .collect(),
        },
        ViewMode::List => Projection::List {
            tasks: board
                .tasks()
                .filter(|(c, t)| query.status.accepts(&c.title) && keep(t))
                .map(|(c, t)| ListEntry {
                    task: t.clone(),
                    status_title: c.title.clone(),
                })
                .collect(),
        },
    }
}

pub fn stats(board: &Board) -> BoardStats {
    let mut by_status: Vec<StatusCount> = Vec::new();
    for column in board.columns() {
        match by_status.iter_mut().find(|s| s.status == column.title) {
            Some(entry) => entry.count += column.tasks.len(),
            None => by_status.push(StatusCount {
                status: column.title.clone(),
                count: column.tasks.len(),
            }),
        }
    }

    let mut stats = BoardStats {
        total: board.task_count(),
        by_status,
        offers: 0,
        accepted: 0,
    };
    stats.offers = stats.count_for(OFFER_STATUS);
    stats.accepted = stats.count_for(ACCEPTED_STATUS);
    stats
}

fn matches_priority(task: &Task, filter: PriorityFilter) -> bool {
    match filter {
        PriorityFilter::All => true,
        PriorityFilter::Only(p) => task.priority == p,
    }
}

/// `needle` must already be trimmed and lower-cased; empty matches everything.
fn matches_text(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let tags = task.tags.join(" ");
    let haystack = [
        task.company.as_str(),
        task.role.as_str(),
        task.notes.as_str(),
        tags.as_str(),
    ]
    .join(" ")
    .to_lowercase();
    haystack.contains(needle)
}
