/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    // Check current version
    let current_version = get_current_version(conn)?;

    // Run migrations if needed
    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the core tables for habits, the daily completion log,
/// itinerary items, and the weekly schedule.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    // Create habits table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Create date_entries table. Completions are stored as a JSON array;
    // all_completed and streak_days hold engine output only.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS date_entries (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            completions TEXT NOT NULL,
            all_completed BOOLEAN NOT NULL DEFAULT FALSE,
            streak_days INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    // Create itinerary_items table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS itinerary_items (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT
        )",
        [],
    )?;

    // Create schedule_slots table (slot keys like 'Mon-08:30')
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedule_slots (
            slot TEXT PRIMARY KEY,
            item_id TEXT NOT NULL,
            FOREIGN KEY (item_id) REFERENCES itinerary_items (id)
        )",
        [],
    )?;

    // Single-row table for grid settings
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedule_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            start_time TEXT NOT NULL,
            interval_minutes INTEGER NOT NULL,
            week_start TEXT NOT NULL
        )",
        [],
    )?;

    // Create indexes for better query performance
    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // One log entry per calendar day; the date is also the usual lookup key
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_date_entries_date
         ON date_entries (date)",
        [],
    )?;

    // Index for listing habits in creation order
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_created_at
         ON habits (created_at)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
