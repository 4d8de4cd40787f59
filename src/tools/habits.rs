/// Tools for managing habits
///
/// Create, list, rename, and delete the habits tracked by the daily log.
/// Deleting a habit also rewrites the log so no day keeps a completion flag
/// for a habit that no longer exists, then re-runs the streak engine.

use serde::{Deserialize, Serialize};
use crate::domain::{compute_streaks, Habit, HabitId};
use crate::storage::TrackerStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    /// Short icon shown next to the name; defaults to a star
    pub icon: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: TrackerStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let icon = params.icon.unwrap_or_else(|| "⭐".to_string());
    let habit = Habit::new(params.name, icon)?;

    storage.create_habit(&habit)?;

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("Created habit '{}' {}", habit.name, habit.icon),
    })
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub icon: String,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
}

/// List all habits, oldest first
pub fn list_habits<S: TrackerStorage>(storage: &S) -> Result<ListHabitsResponse, ToolError> {
    let habits = storage
        .list_habits()?
        .into_iter()
        .map(|habit| HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name,
            icon: habit.icon,
        })
        .collect();

    Ok(ListHabitsResponse { habits })
}

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: TrackerStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    let mut habit = storage.get_habit(&habit_id)?;
    habit.update(params.name, params.icon)?;
    storage.update_habit(&habit)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Updated habit '{}'", habit.name),
    })
}

/// Parameters for deleting a habit
#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
    /// How many log entries were rewritten
    pub entries_updated: u32,
}

/// Delete a habit and scrub it from the completion log
///
/// Removing a flag can turn a previously incomplete day into a fully
/// completed one, so the engine runs over the whole log before anything is
/// persisted.
pub fn delete_habit<S: TrackerStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    let habit = storage.get_habit(&habit_id)?;
    storage.delete_habit(&habit_id)?;

    let mut entries = storage.list_entries()?;
    let mut touched = 0u32;
    for entry in entries.iter_mut() {
        if entry.remove_habit(&habit_id) {
            touched += 1;
        }
    }

    let annotated = compute_streaks(entries);
    storage.update_entries(&annotated)?;

    Ok(DeleteHabitResponse {
        success: true,
        message: format!("Deleted habit '{}'", habit.name),
        entries_updated: touched,
    })
}

/// Parse a habit id string, mapping failures to a tool error
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    HabitId::from_string(raw)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit id '{}'", raw)))
}
