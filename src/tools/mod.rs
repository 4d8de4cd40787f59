/// Tools for tracker management
///
/// This module contains all the tools that external clients can call to
/// interact with the tracker: habit CRUD, the daily completion log,
/// itinerary items, the weekly schedule, and read-only statistics.

pub mod habits;
pub mod log;
pub mod itinerary;
pub mod schedule;
pub mod status;
pub mod charts;

// Re-export tool functions for easy access
pub use habits::*;
pub use log::*;
pub use itinerary::*;
pub use schedule::*;
pub use status::*;
pub use charts::*;

use thiserror::Error;
use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors surfaced by the tools layer
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}
