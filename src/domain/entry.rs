/// DateEntry entity for the daily completion log
///
/// This module defines the per-day record: which habits were completed on a
/// given calendar date, plus the derived all-completed flag and streak count
/// that the streak engine maintains.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{EntryId, HabitId};

/// Completion flag for one habit on one day
///
/// The habit id is fixed for the lifetime of the record; only `completed`
/// changes, flipped by user toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCompletion {
    /// Which habit this flag is for
    pub habit_id: HabitId,
    /// Whether the habit was completed on this day
    pub completed: bool,
}

impl HabitCompletion {
    /// Create a blank (not completed) flag for a habit
    pub fn blank(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            completed: false,
        }
    }
}

/// One tracked day in the completion log
///
/// Holds one completion flag per habit known when the day was logged.
/// `all_completed` and `streak_days` are derived values: they are only
/// meaningful after the streak engine has annotated the collection, and the
/// engine recomputes both on every mutation so stored data never disagrees
/// with the flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    /// Unique identifier for this entry
    pub id: EntryId,
    /// Calendar day this entry records
    pub date: NaiveDate,
    /// One completion flag per habit tracked on this day
    pub completions: Vec<HabitCompletion>,
    /// Derived: true iff every completion flag is set (false for an empty set)
    pub all_completed: bool,
    /// Derived: consecutive fully-completed days ending at this date
    pub streak_days: u32,
}

impl DateEntry {
    /// Create a new entry for a date with blank flags for the given habits
    ///
    /// Derived fields start at their zero values; the caller is expected to
    /// run the streak engine over the full collection afterwards.
    pub fn new(date: NaiveDate, habit_ids: impl IntoIterator<Item = HabitId>) -> Self {
        Self {
            id: EntryId::new(),
            date,
            completions: habit_ids.into_iter().map(HabitCompletion::blank).collect(),
            all_completed: false,
            streak_days: 0,
        }
    }

    /// Create an entry from existing data (used when loading from database)
    pub fn from_existing(
        id: EntryId,
        date: NaiveDate,
        completions: Vec<HabitCompletion>,
        all_completed: bool,
        streak_days: u32,
    ) -> Self {
        Self {
            id,
            date,
            completions,
            all_completed,
            streak_days,
        }
    }

    /// Look up the completion flag for a habit, if this day tracks it
    pub fn completion_for(&self, habit_id: &HabitId) -> Option<&HabitCompletion> {
        self.completions.iter().find(|c| &c.habit_id == habit_id)
    }

    /// Flip the completion flag for a habit
    ///
    /// Returns false when this day does not track the habit. The derived
    /// fields are left stale on purpose; callers re-run the streak engine
    /// over the whole collection after any toggle.
    pub fn toggle(&mut self, habit_id: &HabitId) -> bool {
        match self.completions.iter_mut().find(|c| &c.habit_id == habit_id) {
            Some(completion) => {
                completion.completed = !completion.completed;
                true
            }
            None => false,
        }
    }

    /// Remove the completion flag for a habit (used when a habit is deleted)
    ///
    /// Returns true when a flag was removed.
    pub fn remove_habit(&mut self, habit_id: &HabitId) -> bool {
        let before = self.completions.len();
        self.completions.retain(|c| &c.habit_id != habit_id);
        self.completions.len() != before
    }
}
