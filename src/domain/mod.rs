/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, DateEntry, ItineraryItem,
/// Schedule) and the streak engine that derives completion statistics from
/// the daily log.

pub mod habit;
pub mod entry;
pub mod streak;
pub mod itinerary;
pub mod schedule;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use entry::*;
pub use streak::*;
pub use itinerary::*;
pub use schedule::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid itinerary item: {0}")]
    InvalidItineraryItem(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid schedule slot: {0}")]
    InvalidSlot(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
