/// Tools for the daily completion log
///
/// Every mutation here follows the same loop: load the full log, apply the
/// change, re-run the streak engine over the whole collection, persist the
/// annotated result, and return it. Streaks and all-completed flags are never
/// patched incrementally, so a single entry point guards the invariant that
/// stored derived data always agrees with the completion flags.

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, Utc};
use crate::domain::{compute_streaks, current_streak, DateEntry, EntryId};
use crate::storage::TrackerStorage;
use crate::tools::{habits::parse_habit_id, ToolError};

/// Response carrying the annotated log
///
/// Entries come back ascending by date, the engine's output order.
#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub success: bool,
    pub message: String,
    pub entries: Vec<DateEntry>,
}

/// Re-run the engine and persist the result
fn reconcile<S: TrackerStorage>(
    storage: &S,
    entries: Vec<DateEntry>,
) -> Result<Vec<DateEntry>, ToolError> {
    let annotated = compute_streaks(entries);
    storage.update_entries(&annotated)?;
    Ok(annotated)
}

/// Fetch the completion log, annotated
///
/// Annotation happens on every read as well as every write; a log written by
/// an older build gets its derived fields repaired the first time it is
/// loaded.
pub fn fetch_log<S: TrackerStorage>(storage: &S) -> Result<LogResponse, ToolError> {
    let entries = reconcile(storage, storage.list_entries()?)?;

    Ok(LogResponse {
        success: true,
        message: format!("{} tracked days", entries.len()),
        entries,
    })
}

/// Parameters for adding a new tracked day
#[derive(Debug, Deserialize)]
pub struct AddDateParams {
    /// Day to track (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

/// Response from adding a tracked day
#[derive(Debug, Serialize)]
pub struct AddDateResponse {
    pub success: bool,
    pub message: String,
    pub entry_id: String,
    pub entries: Vec<DateEntry>,
}

/// Add a new tracked day with a blank flag for every known habit
pub fn add_log_date<S: TrackerStorage>(
    storage: &S,
    params: AddDateParams,
) -> Result<AddDateResponse, ToolError> {
    let date = match params.date {
        Some(raw) => parse_date(&raw)?,
        None => Utc::now().naive_utc().date(),
    };

    let habit_ids = storage.list_habits()?.into_iter().map(|h| h.id);
    let entry = DateEntry::new(date, habit_ids);
    let entry_id = entry.id.to_string();

    storage.create_entry(&entry)?;

    // The blank row is persisted; annotate the collection it now belongs to.
    let entries = reconcile(storage, storage.list_entries()?)?;

    Ok(AddDateResponse {
        success: true,
        message: format!("Now tracking {}", date),
        entry_id,
        entries,
    })
}

/// Parameters for toggling one habit on one day
#[derive(Debug, Deserialize)]
pub struct ToggleCompletionParams {
    pub entry_id: String,
    pub habit_id: String,
}

/// Response from a toggle
#[derive(Debug, Serialize)]
pub struct ToggleCompletionResponse {
    pub success: bool,
    pub message: String,
    /// Streak ending at the most recent tracked day, after the toggle
    pub current_streak: u32,
    pub entries: Vec<DateEntry>,
}

/// Flip a habit's completion flag for a day, then reconcile the whole log
pub fn toggle_completion<S: TrackerStorage>(
    storage: &S,
    params: ToggleCompletionParams,
) -> Result<ToggleCompletionResponse, ToolError> {
    let entry_id = parse_entry_id(&params.entry_id)?;
    let habit_id = parse_habit_id(&params.habit_id)?;

    let mut entries = storage.list_entries()?;
    let entry = entries
        .iter_mut()
        .find(|e| e.id == entry_id)
        .ok_or(ToolError::Storage(crate::storage::StorageError::EntryNotFound {
            entry_id: params.entry_id.clone(),
        }))?;

    if !entry.toggle(&habit_id) {
        return Err(ToolError::InvalidParams(format!(
            "Day {} does not track habit {}",
            entry.date, params.habit_id
        )));
    }
    let date = entry.date;

    let entries = reconcile(storage, entries)?;
    let streak = current_streak(&entries);

    Ok(ToggleCompletionResponse {
        success: true,
        message: format!("Toggled habit for {}. Current streak: {} days", date, streak),
        current_streak: streak,
        entries,
    })
}

/// Parameters for re-dating a tracked day
#[derive(Debug, Deserialize)]
pub struct EditDateParams {
    pub entry_id: String,
    /// New day (YYYY-MM-DD)
    pub date: String,
}

/// Re-date an entry, then reconcile the whole log
///
/// Moving a day can join or split chains on both sides of the old and the
/// new position; the full re-run covers every case.
pub fn edit_log_date<S: TrackerStorage>(
    storage: &S,
    params: EditDateParams,
) -> Result<LogResponse, ToolError> {
    let entry_id = parse_entry_id(&params.entry_id)?;
    let new_date = parse_date(&params.date)?;

    let mut entries = storage.list_entries()?;
    let entry = entries
        .iter_mut()
        .find(|e| e.id == entry_id)
        .ok_or(ToolError::Storage(crate::storage::StorageError::EntryNotFound {
            entry_id: params.entry_id.clone(),
        }))?;

    let old_date = entry.date;
    entry.date = new_date;

    let entries = reconcile(storage, entries)?;

    Ok(LogResponse {
        success: true,
        message: format!("Moved {} to {}", old_date, new_date),
        entries,
    })
}

/// Parameters for deleting a tracked day
#[derive(Debug, Deserialize)]
pub struct DeleteEntryParams {
    pub entry_id: String,
}

/// Delete a tracked day, then reconcile the remainder
pub fn delete_log_entry<S: TrackerStorage>(
    storage: &S,
    params: DeleteEntryParams,
) -> Result<LogResponse, ToolError> {
    let entry_id = parse_entry_id(&params.entry_id)?;

    storage.delete_entry(&entry_id)?;
    let entries = reconcile(storage, storage.list_entries()?)?;

    Ok(LogResponse {
        success: true,
        message: "Removed tracked day".to_string(),
        entries,
    })
}

/// Parse a YYYY-MM-DD date string, mapping failures to a tool error
fn parse_date(raw: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidParams(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Parse an entry id string, mapping failures to a tool error
fn parse_entry_id(raw: &str) -> Result<EntryId, ToolError> {
    EntryId::from_string(raw)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid entry id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::tools::habits::{create_habit, CreateHabitParams};

    fn storage_with_habit() -> (SqliteStorage, String) {
        let storage = SqliteStorage::in_memory().unwrap();
        let habit = create_habit(
            &storage,
            CreateHabitParams {
                name: "Run".to_string(),
                icon: None,
            },
        )
        .unwrap();
        (storage, habit.habit_id)
    }

    fn add_day(storage: &SqliteStorage, date: &str) -> String {
        add_log_date(
            storage,
            AddDateParams {
                date: Some(date.to_string()),
            },
        )
        .unwrap()
        .entry_id
    }

    #[test]
    fn test_add_date_tracks_known_habits() {
        let (storage, habit_id) = storage_with_habit();

        let response = add_log_date(
            &storage,
            AddDateParams {
                date: Some("2025-01-10".to_string()),
            },
        )
        .unwrap();

        assert_eq!(response.entries.len(), 1);
        let entry = &response.entries[0];
        assert_eq!(entry.completions.len(), 1);
        assert_eq!(entry.completions[0].habit_id.to_string(), habit_id);
        assert!(!entry.all_completed);
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let (storage, _) = storage_with_habit();
        add_day(&storage, "2025-01-10");

        let second = add_log_date(
            &storage,
            AddDateParams {
                date: Some("2025-01-10".to_string()),
            },
        );
        assert!(second.is_err());
    }

    #[test]
    fn test_toggle_builds_streak() {
        let (storage, habit_id) = storage_with_habit();
        let first = add_day(&storage, "2025-01-10");
        let second = add_day(&storage, "2025-01-11");

        toggle_completion(
            &storage,
            ToggleCompletionParams {
                entry_id: first,
                habit_id: habit_id.clone(),
            },
        )
        .unwrap();

        let response = toggle_completion(
            &storage,
            ToggleCompletionParams {
                entry_id: second,
                habit_id,
            },
        )
        .unwrap();

        assert_eq!(response.current_streak, 2);
        let streaks: Vec<u32> = response.entries.iter().map(|e| e.streak_days).collect();
        assert_eq!(streaks, vec![1, 2]);
    }

    #[test]
    fn test_toggle_off_resets_streak() {
        let (storage, habit_id) = storage_with_habit();
        let entry_id = add_day(&storage, "2025-01-10");

        toggle_completion(
            &storage,
            ToggleCompletionParams {
                entry_id: entry_id.clone(),
                habit_id: habit_id.clone(),
            },
        )
        .unwrap();

        let response = toggle_completion(
            &storage,
            ToggleCompletionParams {
                entry_id,
                habit_id,
            },
        )
        .unwrap();

        assert_eq!(response.current_streak, 0);
        assert!(!response.entries[0].all_completed);
    }

    #[test]
    fn test_edit_date_joins_chain() {
        let (storage, habit_id) = storage_with_habit();
        let first = add_day(&storage, "2025-01-10");
        let second = add_day(&storage, "2025-01-20");

        for entry_id in [&first, &second] {
            toggle_completion(
                &storage,
                ToggleCompletionParams {
                    entry_id: entry_id.clone(),
                    habit_id: habit_id.clone(),
                },
            )
            .unwrap();
        }

        let response = edit_log_date(
            &storage,
            EditDateParams {
                entry_id: second,
                date: "2025-01-11".to_string(),
            },
        )
        .unwrap();

        let streaks: Vec<u32> = response.entries.iter().map(|e| e.streak_days).collect();
        assert_eq!(streaks, vec![1, 2]);
    }

    #[test]
    fn test_delete_entry_recomputes() {
        let (storage, habit_id) = storage_with_habit();
        let first = add_day(&storage, "2025-01-10");
        let second = add_day(&storage, "2025-01-11");
        let third = add_day(&storage, "2025-01-12");

        for entry_id in [&first, &second, &third] {
            toggle_completion(
                &storage,
                ToggleCompletionParams {
                    entry_id: entry_id.clone(),
                    habit_id: habit_id.clone(),
                },
            )
            .unwrap();
        }

        let response = delete_log_entry(
            &storage,
            DeleteEntryParams { entry_id: second },
        )
        .unwrap();

        // The chain is broken in the middle: 1, then a fresh 1.
        let streaks: Vec<u32> = response.entries.iter().map(|e| e.streak_days).collect();
        assert_eq!(streaks, vec![1, 1]);
    }

    #[test]
    fn test_fetch_repairs_stale_derived_fields() {
        let (storage, habit_id) = storage_with_habit();
        let entry_id = add_day(&storage, "2025-01-10");
        toggle_completion(
            &storage,
            ToggleCompletionParams {
                entry_id: entry_id.clone(),
                habit_id,
            },
        )
        .unwrap();

        // Corrupt the stored derived fields behind the shell's back.
        let parsed = EntryId::from_string(&entry_id).unwrap();
        let mut raw = crate::storage::TrackerStorage::get_entry(&storage, &parsed).unwrap();
        raw.all_completed = false;
        raw.streak_days = 99;
        crate::storage::TrackerStorage::update_entry(&storage, &raw).unwrap();

        let response = fetch_log(&storage).unwrap();
        assert!(response.entries[0].all_completed);
        assert_eq!(response.entries[0].streak_days, 1);
    }
}
