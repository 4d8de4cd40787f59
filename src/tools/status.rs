/// Tool for checking tracker status and streaks
///
/// Summarizes the annotated log: current and best streak, tracked days,
/// fully completed days, and the habit roster.

use serde::Serialize;
use crate::analytics::{AnalyticsEngine, StreakSummary};
use crate::domain::compute_streaks;
use crate::storage::TrackerStorage;
use crate::tools::ToolError;

/// Response from checking tracker status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub summary: StreakSummary,
    pub habit_count: u32,
    pub message: String,
}

/// Summarize the tracker's streak state
pub fn get_status<S: TrackerStorage>(storage: &S) -> Result<StatusResponse, ToolError> {
    let habits = storage.list_habits()?;
    let entries = compute_streaks(storage.list_entries()?);

    let summary = AnalyticsEngine::new().streak_summary(&entries);

    let message = if entries.is_empty() {
        "No tracked days yet. Add a date to get started!".to_string()
    } else {
        format!(
            "🔥 Current streak: {} day{} | Best: {} | {} of {} days fully completed | {} habits",
            summary.current_streak,
            if summary.current_streak == 1 { "" } else { "s" },
            summary.longest_streak,
            summary.completed_days,
            summary.total_days,
            habits.len()
        )
    };

    Ok(StatusResponse {
        summary,
        habit_count: habits.len() as u32,
        message,
    })
}

/// Response from requesting insights
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
    pub message: String,
}

/// Generate short textual insights about the tracker
pub fn get_insights<S: TrackerStorage>(storage: &S) -> Result<InsightsResponse, ToolError> {
    let habits = storage.list_habits()?;
    let entries = compute_streaks(storage.list_entries()?);

    let insights = AnalyticsEngine::new().generate_insights(&habits, &entries);
    let message = insights.join("\n");

    Ok(InsightsResponse { insights, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::tools::habits::{create_habit, CreateHabitParams};
    use crate::tools::log::{add_log_date, toggle_completion, AddDateParams, ToggleCompletionParams};

    #[test]
    fn test_status_empty_tracker() {
        let storage = SqliteStorage::in_memory().unwrap();
        let status = get_status(&storage).unwrap();

        assert_eq!(status.summary.current_streak, 0);
        assert_eq!(status.summary.total_days, 0);
        assert!(status.message.contains("No tracked days"));
    }

    #[test]
    fn test_status_reflects_streak() {
        let storage = SqliteStorage::in_memory().unwrap();
        let habit = create_habit(
            &storage,
            CreateHabitParams {
                name: "Run".to_string(),
                icon: None,
            },
        )
        .unwrap();

        for date in ["2025-01-10", "2025-01-11"] {
            let added = add_log_date(
                &storage,
                AddDateParams {
                    date: Some(date.to_string()),
                },
            )
            .unwrap();
            toggle_completion(
                &storage,
                ToggleCompletionParams {
                    entry_id: added.entry_id,
                    habit_id: habit.habit_id.clone(),
                },
            )
            .unwrap();
        }

        let status = get_status(&storage).unwrap();
        assert_eq!(status.summary.current_streak, 2);
        assert_eq!(status.summary.completed_days, 2);
        assert_eq!(status.habit_count, 1);
        assert!(status.message.contains("Current streak: 2 days"));
    }

    #[test]
    fn test_insights_for_fresh_tracker() {
        let storage = SqliteStorage::in_memory().unwrap();
        let insights = get_insights(&storage).unwrap();

        assert_eq!(insights.insights.len(), 1);
        assert!(insights.message.contains("first habit"));
    }
}
