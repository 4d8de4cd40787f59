/// Storage layer for persisting tracker data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits, the daily log,
/// itinerary items, and the weekly schedule.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{DateEntry, EntryId, Habit, HabitId, ItineraryId, ItineraryItem, Schedule};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Entry not found: {entry_id}")]
    EntryNotFound { entry_id: String },

    #[error("Itinerary item not found: {item_id}")]
    ItemNotFound { item_id: String },

    #[error("Duplicate entry: date {date} is already tracked")]
    DuplicateDate { date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for the tracker
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait TrackerStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Update an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List all habits, oldest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Create a new log entry
    fn create_entry(&self, entry: &DateEntry) -> Result<(), StorageError>;

    /// Get a log entry by ID
    fn get_entry(&self, entry_id: &EntryId) -> Result<DateEntry, StorageError>;

    /// Get the full completion log, ascending by date
    fn list_entries(&self) -> Result<Vec<DateEntry>, StorageError>;

    /// Update an existing log entry, including its derived fields
    fn update_entry(&self, entry: &DateEntry) -> Result<(), StorageError>;

    /// Persist derived data for a whole engine-annotated collection
    fn update_entries(&self, entries: &[DateEntry]) -> Result<(), StorageError>;

    /// Delete a log entry
    fn delete_entry(&self, entry_id: &EntryId) -> Result<(), StorageError>;

    /// Create a new itinerary item
    fn create_item(&self, item: &ItineraryItem) -> Result<(), StorageError>;

    /// Get an itinerary item by ID
    fn get_item(&self, item_id: &ItineraryId) -> Result<ItineraryItem, StorageError>;

    /// Update an existing itinerary item
    fn update_item(&self, item: &ItineraryItem) -> Result<(), StorageError>;

    /// Delete an itinerary item
    fn delete_item(&self, item_id: &ItineraryId) -> Result<(), StorageError>;

    /// List all itinerary items
    fn list_items(&self) -> Result<Vec<ItineraryItem>, StorageError>;

    /// Load the weekly schedule (defaults when nothing is stored yet)
    fn load_schedule(&self) -> Result<Schedule, StorageError>;

    /// Persist the weekly schedule, settings and slots together
    fn save_schedule(&self, schedule: &Schedule) -> Result<(), StorageError>;
}
