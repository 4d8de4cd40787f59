/// Analytics over the completion log
///
/// This module turns the engine-annotated log into the numbers clients
/// display: streak summaries, per-habit completion rates for the completion
/// chart, and the date-ordered streak series for the streak chart.

use serde::Serialize;
use chrono::NaiveDate;
use crate::domain::{current_streak, longest_streak, DateEntry, Habit};

/// Aggregate streak statistics for the whole tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakSummary {
    /// Streak ending at the most recent tracked day
    pub current_streak: u32,
    /// Best streak anywhere in the log
    pub longest_streak: u32,
    /// Number of tracked days
    pub total_days: u32,
    /// Number of fully completed days
    pub completed_days: u32,
}

/// Completion percentage for one habit across the tracked days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitCompletionRate {
    pub habit_id: String,
    pub name: String,
    /// Rounded percentage of tracked days on which the habit was completed
    pub completion_percent: u32,
}

/// One point of the streak-over-time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakPoint {
    pub date: NaiveDate,
    pub streak_days: u32,
}

/// Analytics engine for processing tracker data
///
/// All methods expect the collection to have been annotated by the streak
/// engine; none of them mutate anything.
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Summarize streak statistics over the annotated log
    pub fn streak_summary(&self, entries: &[DateEntry]) -> StreakSummary {
        StreakSummary {
            current_streak: current_streak(entries),
            longest_streak: longest_streak(entries),
            total_days: entries.len() as u32,
            completed_days: entries.iter().filter(|e| e.all_completed).count() as u32,
        }
    }

    /// Per-habit completion percentages across all tracked days
    ///
    /// A habit counts as completed on a day when that day carries a set flag
    /// for it. Days logged before the habit existed simply don't count in its
    /// favor; the denominator is the full log either way, matching how the
    /// completion chart has always read.
    pub fn completion_rates(
        &self,
        habits: &[Habit],
        entries: &[DateEntry],
    ) -> Vec<HabitCompletionRate> {
        let total_days = entries.len();

        habits
            .iter()
            .map(|habit| {
                let completed_days = entries
                    .iter()
                    .filter(|entry| {
                        entry
                            .completion_for(&habit.id)
                            .map(|c| c.completed)
                            .unwrap_or(false)
                    })
                    .count();

                let completion_percent = if total_days == 0 {
                    0
                } else {
                    ((completed_days as f64 / total_days as f64) * 100.0).round() as u32
                };

                HabitCompletionRate {
                    habit_id: habit.id.to_string(),
                    name: habit.name.clone(),
                    completion_percent,
                }
            })
            .collect()
    }

    /// Date-ordered streak series for charting
    pub fn streak_series(&self, entries: &[DateEntry]) -> Vec<StreakPoint> {
        let mut points: Vec<StreakPoint> = entries
            .iter()
            .map(|entry| StreakPoint {
                date: entry.date,
                streak_days: entry.streak_days,
            })
            .collect();
        points.sort_by_key(|p| p.date);
        points
    }

    /// Generate short textual insights about the tracker
    pub fn generate_insights(&self, habits: &[Habit], entries: &[DateEntry]) -> Vec<String> {
        let mut insights = Vec::new();

        if habits.is_empty() {
            insights.push("Start by creating your first habit to track!".to_string());
            return insights;
        }

        if entries.is_empty() {
            insights.push("Great job creating habits! Now log your first day.".to_string());
            return insights;
        }

        let summary = self.streak_summary(entries);
        insights.push(format!(
            "You are tracking {} habits across {} days.",
            habits.len(),
            summary.total_days
        ));

        if summary.current_streak > 0 {
            insights.push(format!(
                "Current streak: {} day{}. Keep it going!",
                summary.current_streak,
                if summary.current_streak == 1 { "" } else { "s" }
            ));
        } else if summary.longest_streak > 0 {
            insights.push(format!(
                "Your best streak so far is {} days. Today is a good day to start a new one.",
                summary.longest_streak
            ));
        }

        if let Some(weakest) = self
            .completion_rates(habits, entries)
            .into_iter()
            .min_by_key(|r| r.completion_percent)
        {
            insights.push(format!(
                "'{}' has the lowest completion rate at {}%.",
                weakest.name, weakest.completion_percent
            ));
        }

        insights
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
