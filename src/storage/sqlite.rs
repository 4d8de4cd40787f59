/// SQLite implementation of the tracker storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving tracker data. It handles all SQL queries and data
/// conversion.

use std::collections::HashMap;
use std::path::PathBuf;
use rusqlite::{Connection, params};
use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::domain::{
    DateEntry, EntryId, Habit, HabitId, ItineraryId, ItineraryItem, Schedule, Slot,
};
use crate::storage::{StorageError, TrackerStorage, migrations};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the TrackerStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        // Open the SQLite database
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        // Initialize/migrate the database schema
        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open an in-memory database (used by tests)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Column-level error for values that fail to parse back out of SQLite
    fn column_error(index: usize, what: &str) -> rusqlite::Error {
        rusqlite::Error::InvalidColumnType(
            index,
            what.to_string(),
            rusqlite::types::Type::Text,
        )
    }

    /// True when another entry already occupies the given date
    fn date_taken(&self, date: NaiveDate, except: Option<&EntryId>) -> Result<bool, StorageError> {
        let exclude = except.map(|id| id.to_string()).unwrap_or_default();
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM date_entries WHERE date = ?1 AND id != ?2",
            params![date.to_string(), exclude],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Shared row mapper for date_entries queries
    fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<DateEntry, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = EntryId::from_string(&id_str)
            .map_err(|_| Self::column_error(0, "Invalid UUID"))?;

        let date_str: String = row.get(1)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| Self::column_error(1, "Invalid date"))?;

        let completions_json: String = row.get(2)?;
        let completions = serde_json::from_str(&completions_json)
            .map_err(|_| Self::column_error(2, "Invalid completions"))?;

        Ok(DateEntry::from_existing(
            id,
            date,
            completions,
            row.get(3)?, // all_completed
            row.get(4)?, // streak_days
        ))
    }
}

impl TrackerStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, icon, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.icon,
                habit.created_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id.to_string());
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, created_at FROM habits WHERE id = ?1"
        )?;

        let result = stmt.query_row(params![habit_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let id = HabitId::from_string(&id_str)
                .map_err(|_| Self::column_error(0, "Invalid UUID"))?;

            let created_at_str: String = row.get(3)?;
            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                .map_err(|_| Self::column_error(3, "Invalid datetime"))?
                .with_timezone(&chrono::Utc);

            Ok(Habit::from_existing(
                id,
                row.get(1)?, // name
                row.get(2)?, // icon
                created_at,
            ))
        });

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Update an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?2, icon = ?3 WHERE id = ?1",
            params![habit.id.to_string(), habit.name, habit.icon],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id.to_string());
        Ok(())
    }

    /// Delete a habit
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id.to_string());
        Ok(())
    }

    /// List all habits, oldest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, created_at FROM habits ORDER BY created_at ASC"
        )?;

        let habit_iter = stmt.query_map([], |row| {
            let id_str: String = row.get(0)?;
            let id = HabitId::from_string(&id_str)
                .map_err(|_| Self::column_error(0, "Invalid UUID"))?;

            let created_at_str: String = row.get(3)?;
            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                .map_err(|_| Self::column_error(3, "Invalid datetime"))?
                .with_timezone(&chrono::Utc);

            Ok(Habit::from_existing(
                id,
                row.get(1)?, // name
                row.get(2)?, // icon
                created_at,
            ))
        })?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    /// Create a new log entry
    fn create_entry(&self, entry: &DateEntry) -> Result<(), StorageError> {
        if self.date_taken(entry.date, None)? {
            return Err(StorageError::DuplicateDate {
                date: entry.date.to_string(),
            });
        }

        let completions_json = serde_json::to_string(&entry.completions)?;

        self.conn.execute(
            "INSERT INTO date_entries (id, date, completions, all_completed, streak_days)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                entry.date.to_string(),
                completions_json,
                entry.all_completed,
                entry.streak_days
            ],
        )?;

        tracing::debug!("Created log entry {} for {}", entry.id.to_string(), entry.date);
        Ok(())
    }

    /// Get a log entry by its ID
    fn get_entry(&self, entry_id: &EntryId) -> Result<DateEntry, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, completions, all_completed, streak_days
             FROM date_entries WHERE id = ?1"
        )?;

        let result = stmt.query_row(params![entry_id.to_string()], Self::row_to_entry);

        match result {
            Ok(entry) => Ok(entry),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::EntryNotFound {
                    entry_id: entry_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Get the full completion log, ascending by date
    fn list_entries(&self) -> Result<Vec<DateEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, completions, all_completed, streak_days
             FROM date_entries ORDER BY date ASC"
        )?;

        let entry_iter = stmt.query_map([], Self::row_to_entry)?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// Update an existing log entry, including its derived fields
    fn update_entry(&self, entry: &DateEntry) -> Result<(), StorageError> {
        if self.date_taken(entry.date, Some(&entry.id))? {
            return Err(StorageError::DuplicateDate {
                date: entry.date.to_string(),
            });
        }

        let completions_json = serde_json::to_string(&entry.completions)?;

        let rows_affected = self.conn.execute(
            "UPDATE date_entries SET
                date = ?2,
                completions = ?3,
                all_completed = ?4,
                streak_days = ?5
             WHERE id = ?1",
            params![
                entry.id.to_string(),
                entry.date.to_string(),
                completions_json,
                entry.all_completed,
                entry.streak_days
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::EntryNotFound {
                entry_id: entry.id.to_string(),
            });
        }

        tracing::debug!("Updated log entry {}", entry.id.to_string());
        Ok(())
    }

    /// Persist derived data for a whole engine-annotated collection
    fn update_entries(&self, entries: &[DateEntry]) -> Result<(), StorageError> {
        for entry in entries {
            self.update_entry(entry)?;
        }
        Ok(())
    }

    /// Delete a log entry
    fn delete_entry(&self, entry_id: &EntryId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM date_entries WHERE id = ?1",
            params![entry_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::EntryNotFound {
                entry_id: entry_id.to_string(),
            });
        }

        tracing::debug!("Deleted log entry {}", entry_id.to_string());
        Ok(())
    }

    /// Create a new itinerary item
    fn create_item(&self, item: &ItineraryItem) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO itinerary_items (id, name, description) VALUES (?1, ?2, ?3)",
            params![item.id.to_string(), item.name, item.description],
        )?;

        tracing::debug!("Created itinerary item: {} ({})", item.name, item.id.to_string());
        Ok(())
    }

    /// Get an itinerary item by its ID
    fn get_item(&self, item_id: &ItineraryId) -> Result<ItineraryItem, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description FROM itinerary_items WHERE id = ?1"
        )?;

        let result = stmt.query_row(params![item_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let id = ItineraryId::from_string(&id_str)
                .map_err(|_| Self::column_error(0, "Invalid UUID"))?;

            Ok(ItineraryItem::from_existing(
                id,
                row.get(1)?, // name
                row.get(2)?, // description
            ))
        });

        match result {
            Ok(item) => Ok(item),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::ItemNotFound {
                    item_id: item_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Update an existing itinerary item
    fn update_item(&self, item: &ItineraryItem) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE itinerary_items SET name = ?2, description = ?3 WHERE id = ?1",
            params![item.id.to_string(), item.name, item.description],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::ItemNotFound {
                item_id: item.id.to_string(),
            });
        }

        tracing::debug!("Updated itinerary item {}", item.id.to_string());
        Ok(())
    }

    /// Delete an itinerary item and free any slots it occupied
    fn delete_item(&self, item_id: &ItineraryId) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM schedule_slots WHERE item_id = ?1",
            params![item_id.to_string()],
        )?;

        let rows_affected = self.conn.execute(
            "DELETE FROM itinerary_items WHERE id = ?1",
            params![item_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }

        tracing::debug!("Deleted itinerary item {}", item_id.to_string());
        Ok(())
    }

    /// List all itinerary items
    fn list_items(&self) -> Result<Vec<ItineraryItem>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description FROM itinerary_items ORDER BY name ASC"
        )?;

        let item_iter = stmt.query_map([], |row| {
            let id_str: String = row.get(0)?;
            let id = ItineraryId::from_string(&id_str)
                .map_err(|_| Self::column_error(0, "Invalid UUID"))?;

            Ok(ItineraryItem::from_existing(
                id,
                row.get(1)?, // name
                row.get(2)?, // description
            ))
        })?;

        let mut items = Vec::new();
        for item in item_iter {
            items.push(item?);
        }

        Ok(items)
    }

    /// Load the weekly schedule (defaults when nothing is stored yet)
    fn load_schedule(&self) -> Result<Schedule, StorageError> {
        let defaults = Schedule::default();

        let config = self.conn.query_row(
            "SELECT start_time, interval_minutes, week_start FROM schedule_config WHERE id = 1",
            [],
            |row| {
                let start_str: String = row.get(0)?;
                let start_time = NaiveTime::parse_from_str(&start_str, "%H:%M")
                    .map_err(|_| Self::column_error(0, "Invalid time"))?;

                let interval_minutes: u32 = row.get(1)?;

                let week_start_str: String = row.get(2)?;
                let week_start: Weekday = week_start_str
                    .parse()
                    .map_err(|_| Self::column_error(2, "Invalid weekday"))?;

                Ok((start_time, interval_minutes, week_start))
            },
        );

        let (start_time, interval_minutes, week_start) = match config {
            Ok(settings) => settings,
            Err(rusqlite::Error::QueryReturnedNoRows) => (
                defaults.start_time,
                defaults.interval_minutes,
                defaults.week_start,
            ),
            Err(e) => return Err(StorageError::Query(e)),
        };

        let mut stmt = self.conn.prepare("SELECT slot, item_id FROM schedule_slots")?;
        let slot_iter = stmt.query_map([], |row| {
            let slot_key: String = row.get(0)?;
            let slot = Slot::from_key(&slot_key)
                .map_err(|_| Self::column_error(0, "Invalid slot key"))?;

            let item_id_str: String = row.get(1)?;
            let item_id = ItineraryId::from_string(&item_id_str)
                .map_err(|_| Self::column_error(1, "Invalid UUID"))?;

            Ok((slot, item_id))
        })?;

        let mut slots = HashMap::new();
        for pair in slot_iter {
            let (slot, item_id) = pair?;
            slots.insert(slot, item_id);
        }

        Ok(Schedule::from_existing(
            slots,
            start_time,
            interval_minutes,
            week_start,
        ))
    }

    /// Persist the weekly schedule, settings and slots together
    fn save_schedule(&self, schedule: &Schedule) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schedule_config (id, start_time, interval_minutes, week_start)
             VALUES (1, ?1, ?2, ?3)",
            params![
                schedule.start_time.format("%H:%M").to_string(),
                schedule.interval_minutes,
                schedule.week_start.to_string()
            ],
        )?;

        self.conn.execute("DELETE FROM schedule_slots", [])?;
        for (slot, item_id) in &schedule.slots {
            self.conn.execute(
                "INSERT INTO schedule_slots (slot, item_id) VALUES (?1, ?2)",
                params![slot.key(), item_id.to_string()],
            )?;
        }

        tracing::debug!("Saved schedule with {} assigned slots", schedule.slots.len());
        Ok(())
    }
}
