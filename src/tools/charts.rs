/// Tools producing chart data series
///
/// Clients render the charts; these tools only prepare the numbers: per-habit
/// completion percentages for the completion bar chart and the date-ordered
/// streak series for the streak line chart.

use serde::Serialize;
use crate::analytics::{AnalyticsEngine, HabitCompletionRate, StreakPoint};
use crate::domain::compute_streaks;
use crate::storage::TrackerStorage;
use crate::tools::ToolError;

/// Response carrying per-habit completion percentages
#[derive(Debug, Serialize)]
pub struct CompletionChartResponse {
    pub total_days: u32,
    pub rates: Vec<HabitCompletionRate>,
}

/// Completion percentage per habit across all tracked days
pub fn completion_chart<S: TrackerStorage>(
    storage: &S,
) -> Result<CompletionChartResponse, ToolError> {
    let habits = storage.list_habits()?;
    let entries = compute_streaks(storage.list_entries()?);

    Ok(CompletionChartResponse {
        total_days: entries.len() as u32,
        rates: AnalyticsEngine::new().completion_rates(&habits, &entries),
    })
}

/// Response carrying the streak-over-time series
#[derive(Debug, Serialize)]
pub struct StreakChartResponse {
    pub points: Vec<StreakPoint>,
}

/// Streak count per tracked day, ascending by date
pub fn streak_chart<S: TrackerStorage>(storage: &S) -> Result<StreakChartResponse, ToolError> {
    let entries = compute_streaks(storage.list_entries()?);

    Ok(StreakChartResponse {
        points: AnalyticsEngine::new().streak_series(&entries),
    })
}
