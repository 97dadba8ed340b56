//! Core types for the job application board.

use chrono::NaiveDate;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub type TaskId = String;
pub type ColumnId = String;

/// The fixed pipeline stages of a fresh board, in display order.
pub const DEFAULT_STAGES: [(&str, &str); 8] = [
    ("column-1", "Wishlist"),
    ("column-2", "Applied"),
    ("column-3", "Phone Screen"),
    ("column-4", "Technical Interview"),
    ("column-5", "Final Round"),
    ("column-6", "Offer"),
    ("column-7", "Accepted"),
    ("column-8", "Rejected"),
];

/// Status title counted as `offers` in board stats.
pub const OFFER_STATUS: &str = "Offer";
/// Status title counted as `accepted` in board stats.
pub const ACCEPTED_STATUS: &str = "Accepted";

/// Application priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a priority name case-insensitively. Blank or unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag input as it arrives from a form: a list, or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    /// Split, trim, and deduplicate into an ordered tag set.
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::List(items) => normalize_tags(items),
            TagsInput::Text(text) => normalize_tags(text.split(',')),
        }
    }
}

impl From<&str> for TagsInput {
    fn from(s: &str) -> Self {
        TagsInput::Text(s.to_string())
    }
}

impl From<String> for TagsInput {
    fn from(s: String) -> Self {
        TagsInput::Text(s)
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(v: Vec<String>) -> Self {
        TagsInput::List(v)
    }
}

impl From<Vec<&str>> for TagsInput {
    fn from(v: Vec<&str>) -> Self {
        TagsInput::List(v.into_iter().map(str::to_string).collect())
    }
}

/// Trim each tag, drop blanks, and keep the first occurrence of duplicates.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Where a due date sits relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DueStatus {
    Overdue { days: i64 },
    DueToday,
    DueIn { days: i64 },
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue { days } => write!(f, "{}d overdue", days),
            DueStatus::DueToday => write!(f, "Due today"),
            DueStatus::DueIn { days } => write!(f, "Due in {}d", days),
        }
    }
}

/// One job application card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: String,
    #[serde(default)]
    pub column_id: ColumnId,
}

impl Task {
    /// Build a task from add-time fields, applying the add-time defaults.
    pub(crate) fn from_fields(id: TaskId, column_id: &str, fields: TaskFields) -> Self {
        Self {
            id,
            company: fields.company.unwrap_or_default(),
            role: fields.role.unwrap_or_default(),
            url: fields.url.unwrap_or_default(),
            notes: fields.notes.unwrap_or_default(),
            priority: fields.priority.unwrap_or_default(),
            tags: fields.tags.unwrap_or_default(),
            due_date: non_blank(fields.due_date).unwrap_or_default(),
            column_id: column_id.to_string(),
        }
    }

    /// Merge edit-time fields over this task. Provided values win; a blank
    /// priority or due date counts as not provided.
    pub(crate) fn merged(&self, fields: TaskFields, column_id: &str) -> Self {
        Self {
            id: self.id.clone(),
            company: fields.company.unwrap_or_else(|| self.company.clone()),
            role: fields.role.unwrap_or_else(|| self.role.clone()),
            url: fields.url.unwrap_or_else(|| self.url.clone()),
            notes: fields.notes.unwrap_or_else(|| self.notes.clone()),
            priority: fields.priority.unwrap_or(self.priority),
            tags: fields.tags.unwrap_or_else(|| self.tags.clone()),
            due_date: non_blank(fields.due_date).unwrap_or_else(|| self.due_date.clone()),
            column_id: column_id.to_string(),
        }
    }

    /// The due date, if set and in `YYYY-MM-DD` form.
    pub fn due_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d").ok()
    }

    pub fn due_status(&self, today: NaiveDate) -> Option<DueStatus> {
        let due = self.due_date_parsed()?;
        let days = (due - today).num_days();
        Some(match days {
            d if d < 0 => DueStatus::Overdue { days: -d },
            0 => DueStatus::DueToday,
            d => DueStatus::DueIn { days: d },
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Field values for creating or editing a task.
///
/// `None` means "not provided". Deserializes from the camelCase form shape;
/// `tags` may be a list or a comma-separated string. An unrecognized
/// priority or a non-string url, notes, or due date is treated as not
/// provided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFields {
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_string_opt")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_string_opt")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "lenient_priority_opt")]
    pub priority: Option<Priority>,
    #[serde(deserialize_with = "lenient_tags_opt")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_string_opt")]
    pub due_date: Option<String>,
}

impl TaskFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_tags(mut self, tags: impl Into<TagsInput>) -> Self {
        self.tags = Some(tags.into().into_tags());
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Check the identifying fields a new card needs. The board engine does
    /// not call this; front ends do before submitting.
    pub fn require_identity(&self) -> crate::error::BoardResult<()> {
        for (name, value) in [("company", &self.company), ("role", &self.role)] {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                return Err(crate::error::BoardError::missing_field(name));
            }
        }
        Ok(())
    }
}

/// One pipeline stage and its ordered cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub id: ColumnId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// The full mapping of stage columns to their ordered task lists.
///
/// Serialized as a JSON object keyed by column id, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            columns: DEFAULT_STAGES
                .iter()
                .map(|(id, title)| Column::new(*id, *title))
                .collect(),
        }
    }
}

impl Board {
    /// Build a board from explicit columns, kept in the given order.
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub(crate) fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    pub fn has_column(&self, column_id: &str) -> bool {
        self.column(column_id).is_some()
    }

    /// Locate a task by id: its column and index within that column.
    pub fn locate(&self, task_id: &str) -> Option<(&Column, usize)> {
        self.columns
            .iter()
            .find_map(|c| c.position_of(task_id).map(|idx| (c, idx)))
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.locate(task_id).map(|(c, idx)| &c.tasks[idx])
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// All tasks in column-then-position order.
    pub fn tasks(&self) -> impl Iterator<Item = (&Column, &Task)> {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter().map(move |t| (c, t)))
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.id, column)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoardVisitor;

        impl<'de> Visitor<'de> for BoardVisitor {
            type Value = Board;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column id to column")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Board, A::Error> {
                let mut columns: Vec<Column> = Vec::new();
                while let Some((key, mut column)) = access.next_entry::<String, Column>()? {
                    if column.id.is_empty() {
                        column.id = key;
                    } else if column.id != key {
                        return Err(de::Error::custom(format!(
                            "column key {} does not match column id {}",
                            key, column.id
                        )));
                    }
                    columns.push(column);
                }
                Ok(Board { columns })
            }
        }

        deserializer.deserialize_map(BoardVisitor)
    }
}

// =============================================================================
// Lenient field decoding: malformed optional values fall back to defaults
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Tags(TagsInput),
    Other(IgnoredAny),
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match RawText::deserialize(d)? {
        RawText::Text(s) => s,
        RawText::Other(_) => String::new(),
    })
}

fn lenient_string_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match RawText::deserialize(d)? {
        RawText::Text(s) => Some(s),
        RawText::Other(_) => None,
    })
}

fn lenient_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Priority, D::Error> {
    Ok(lenient_priority_opt(d)?.unwrap_or_default())
}

fn lenient_priority_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Priority>, D::Error> {
    Ok(match RawText::deserialize(d)? {
        RawText::Text(s) => Priority::parse(&s),
        RawText::Other(_) => None,
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(lenient_tags_opt(d)?.unwrap_or_default())
}

fn lenient_tags_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match RawTags::deserialize(d)? {
        RawTags::Tags(input) => Some(input.into_tags()),
        RawTags::Other(_) => None,
    })
}
