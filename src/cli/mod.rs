//! CLI command definitions for jobtrackr
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod export;
pub mod task;

use crate::board::query::{PriorityFilter, Query, StatusFilter, ViewMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use export::{ExportArgs, ImportArgs};
use std::path::PathBuf;
use task::{AddArgs, EditArgs, MoveArgs};

/// Output format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    #[value(alias = "md")]
    Markdown,
}

/// Track job applications across pipeline stages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add an application to a stage
    Add(AddArgs),

    /// Edit an application's fields or change its stage
    Edit(EditArgs),

    /// Remove an application
    Rm {
        /// Task id
        id: String,
    },

    /// Move an application by position, as a drag-and-drop would
    Mv(MoveArgs),

    /// Show one application
    Show {
        /// Task id
        id: String,
    },

    /// Show the board, one section per stage
    Board(FilterArgs),

    /// Show all applications as a flat list
    List(FilterArgs),

    /// Show counts per stage
    Stats,

    /// List the stages and their column ids
    Columns,

    /// Export the board as JSON
    Export(ExportArgs),

    /// Replace the board with a JSON export
    Import(ImportArgs),
}

/// Search and filter options shared by `board` and `list`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive text matched against company, role, notes, and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Stage title to show, or "all"
    #[arg(long, default_value = "all")]
    pub status: String,

    /// Priority to show (high, medium, low), or "all"
    #[arg(short, long, default_value = "all")]
    pub priority: String,
}

impl FilterArgs {
    /// Build a query in the given view mode.
    pub fn to_query(&self, mode: ViewMode) -> Result<Query, String> {
        let status: StatusFilter = self.status.parse()?;
        let priority: PriorityFilter = self.priority.parse()?;
        Ok(Query::new()
            .with_text(self.search.clone().unwrap_or_default())
            .with_status(status)
            .with_priority(priority)
            .with_mode(mode))
    }
}
