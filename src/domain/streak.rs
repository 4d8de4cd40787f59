/// Streak engine for the daily completion log
///
/// This module derives the `all_completed` flag and consecutive-day streak
/// count for every entry in the log. The engine is a pure function over a
/// snapshot of the collection: it owns no state, performs no I/O, and always
/// terminates. Every mutation of the log re-runs it in full, which keeps the
/// derived fields consistent with the completion flags through a single entry
/// point instead of incremental patching.

use chrono::NaiveDate;
use crate::domain::DateEntry;

/// Recompute derived completion data for the whole log
///
/// Sorts the entries ascending by calendar date (insertion order and id order
/// are irrelevant), then walks them once:
///
/// - `all_completed` becomes the AND over the entry's completion flags. An
///   entry tracking zero habits is treated as not completed; a universal
///   quantifier over an empty set would otherwise call it a perfect day.
/// - `streak_days` is 0 for a day that is not fully completed, 1 for a fully
///   completed day whose predecessor is missing, incomplete, or not exactly
///   one calendar day earlier, and predecessor + 1 otherwise.
///
/// The returned collection is sorted ascending by date and has the same
/// length as the input; all non-derived fields pass through unchanged.
/// Callers needing a different display order re-sort the result.
pub fn compute_streaks(entries: Vec<DateEntry>) -> Vec<DateEntry> {
    let mut sorted = entries;
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut running: u32 = 0;
    let mut prev_date: Option<NaiveDate> = None;

    for entry in sorted.iter_mut() {
        let all_completed = !entry.completions.is_empty()
            && entry.completions.iter().all(|c| c.completed);
        entry.all_completed = all_completed;

        if all_completed {
            // A chain continues only across an exact one-day step. When the
            // previous day was incomplete the counter is already 0, so this
            // still yields 1.
            let consecutive = prev_date.and_then(|d| d.succ_opt()) == Some(entry.date);
            running = if consecutive { running + 1 } else { 1 };
            entry.streak_days = running;
        } else {
            running = 0;
            entry.streak_days = 0;
        }

        prev_date = Some(entry.date);
    }

    sorted
}

/// Streak ending at the most recent tracked day
///
/// Expects an engine-annotated collection; returns 0 for an empty log.
pub fn current_streak(entries: &[DateEntry]) -> u32 {
    entries
        .iter()
        .max_by_key(|e| e.date)
        .map(|e| e.streak_days)
        .unwrap_or(0)
}

/// Best streak anywhere in the log
///
/// Expects an engine-annotated collection; returns 0 for an empty log.
pub fn longest_streak(entries: &[DateEntry]) -> u32 {
    entries.iter().map(|e| e.streak_days).max().unwrap_or(0)
}
