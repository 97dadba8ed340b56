//! Export and import subcommands for jobtrackr
//!
//! The export is the same JSON record the board is stored as, so an export
//! can be re-imported or inspected by hand.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the export subcommand
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the import subcommand
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON export file to import
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Replace a non-empty board
    #[arg(long)]
    pub force: bool,
}
