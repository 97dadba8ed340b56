//! Arguments for the task editing subcommands.

use crate::types::{Board, Priority, TaskFields};
use clap::Args;

/// Arguments for the add subcommand
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Company name
    pub company: String,

    /// Role title
    pub role: String,

    /// Stage to add to, by column id or title
    #[arg(short, long, default_value = "Wishlist")]
    pub stage: String,

    #[command(flatten)]
    pub details: DetailArgs,
}

/// Arguments for the edit subcommand
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Task id
    pub id: String,

    /// New company name
    #[arg(long)]
    pub company: Option<String>,

    /// New role title
    #[arg(long)]
    pub role: Option<String>,

    /// Move to this stage (appended at the end), by column id or title
    #[arg(short, long)]
    pub stage: Option<String>,

    #[command(flatten)]
    pub details: DetailArgs,
}

/// Optional card details shared by add and edit.
#[derive(Args, Debug, Default)]
pub struct DetailArgs {
    /// Job posting URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Priority: high, medium, or low
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Comma-separated tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

impl DetailArgs {
    fn apply(&self, mut fields: TaskFields) -> TaskFields {
        if let Some(url) = &self.url {
            fields = fields.with_url(url.clone());
        }
        if let Some(notes) = &self.notes {
            fields = fields.with_notes(notes.clone());
        }
        if let Some(priority) = self.priority.as_deref().and_then(Priority::parse) {
            fields = fields.with_priority(priority);
        }
        if let Some(tags) = &self.tags {
            fields = fields.with_tags(tags.as_str());
        }
        if let Some(due) = &self.due {
            fields = fields.with_due_date(due.clone());
        }
        fields
    }
}

impl AddArgs {
    pub fn to_fields(&self) -> TaskFields {
        self.details.apply(
            TaskFields::new()
                .with_company(self.company.clone())
                .with_role(self.role.clone()),
        )
    }
}

impl EditArgs {
    pub fn to_fields(&self) -> TaskFields {
        let mut fields = TaskFields::new();
        if let Some(company) = &self.company {
            fields = fields.with_company(company.clone());
        }
        if let Some(role) = &self.role {
            fields = fields.with_role(role.clone());
        }
        self.details.apply(fields)
    }
}

/// Arguments for the mv subcommand
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Source stage, by column id or title
    pub from: String,

    /// Position of the card in the source stage (0-based)
    #[arg(allow_hyphen_values = true)]
    pub from_index: i64,

    /// Destination stage, by column id or title
    pub to: String,

    /// Position to insert at in the destination stage (0-based)
    #[arg(allow_hyphen_values = true)]
    pub to_index: i64,
}

/// Resolve a stage given by column id or (case-insensitive) title.
pub fn resolve_column(board: &Board, stage: &str) -> Option<String> {
    let stage = stage.trim();
    board
        .columns()
        .iter()
        .find(|c| c.id == stage)
        .or_else(|| {
            board
                .columns()
                .iter()
                .find(|c| c.title.eq_ignore_ascii_case(stage))
        })
        .map(|c| c.id.clone())
}
