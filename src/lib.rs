//! JobTrackr board engine
//!
//! Job applications tracked as cards moving through a fixed sequence of
//! stages, with drag-style reordering, filtering, and persisted state.

pub mod board;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod persistence;
pub mod types;

pub use board::BoardStore;
pub use error::{BoardError, BoardResult, ErrorCode};
pub use types::{Board, Column, Priority, Task, TaskFields};
