/// Weekly schedule for itinerary planning
///
/// The schedule is a grid of time slots across the week; each slot can hold
/// one itinerary item. Slots are addressed by weekday plus start time and
/// serialize as `"Mon-08:30"` style keys, the format the grid clients use.

use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{NaiveTime, Weekday};
use crate::domain::{DomainError, ItineraryId};

/// Smallest allowed slot interval, in minutes
pub const MIN_INTERVAL_MINUTES: u32 = 5;
/// Largest allowed slot interval, in minutes
pub const MAX_INTERVAL_MINUTES: u32 = 240;

/// Address of one cell in the weekly grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Day of the week
    pub day: Weekday,
    /// Start time of the slot
    pub start: NaiveTime,
}

impl Slot {
    /// Parse a slot from its `"Mon-08:30"` key form
    pub fn from_key(key: &str) -> Result<Self, DomainError> {
        let (day_str, time_str) = key.split_once('-').ok_or_else(|| {
            DomainError::InvalidSlot(format!(
                "Slot key '{}' must look like 'Mon-08:30'", key
            ))
        })?;

        let day: Weekday = day_str.parse().map_err(|_| {
            DomainError::InvalidSlot(format!("Unknown weekday '{}'", day_str))
        })?;

        let start = NaiveTime::parse_from_str(time_str, "%H:%M").map_err(|_| {
            DomainError::InvalidSlot(format!("Invalid time '{}', expected HH:MM", time_str))
        })?;

        Ok(Self { day, start })
    }

    /// The `"Mon-08:30"` key form of this slot
    pub fn key(&self) -> String {
        format!("{}-{}", self.day, self.start.format("%H:%M"))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The weekly planner: slot assignments plus grid settings
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Assigned slots; unassigned slots are simply absent
    pub slots: HashMap<Slot, ItineraryId>,
    /// First slot of each day
    pub start_time: NaiveTime,
    /// Length of each slot in minutes
    pub interval_minutes: u32,
    /// Day the displayed week starts on
    pub week_start: Weekday,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).expect("valid default time"),
            interval_minutes: 30,
            week_start: Weekday::Sun,
        }
    }
}

impl Schedule {
    /// Build a schedule from persisted data
    pub fn from_existing(
        slots: HashMap<Slot, ItineraryId>,
        start_time: NaiveTime,
        interval_minutes: u32,
        week_start: Weekday,
    ) -> Self {
        Self {
            slots,
            start_time,
            interval_minutes,
            week_start,
        }
    }

    /// Put an itinerary item into a slot, replacing any previous occupant
    pub fn assign(&mut self, slot: Slot, item_id: ItineraryId) {
        self.slots.insert(slot, item_id);
    }

    /// Empty a slot; returns the item that occupied it, if any
    pub fn clear(&mut self, slot: &Slot) -> Option<ItineraryId> {
        self.slots.remove(slot)
    }

    /// Drop every assignment of an itinerary item (used when it is removed)
    pub fn remove_item(&mut self, item_id: &ItineraryId) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, assigned| assigned != item_id);
        before - self.slots.len()
    }

    /// Change the first slot time of each day
    pub fn set_start_time(&mut self, start_time: NaiveTime) {
        self.start_time = start_time;
    }

    /// Change the slot length, validated against the allowed range
    pub fn set_interval(&mut self, minutes: u32) -> Result<(), DomainError> {
        if !(MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES).contains(&minutes) {
            return Err(DomainError::InvalidValue {
                message: format!(
                    "Interval must be between {} and {} minutes",
                    MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES
                ),
            });
        }
        self.interval_minutes = minutes;
        Ok(())
    }

    /// Change the day the week starts on
    pub fn set_week_start(&mut self, day: Weekday) {
        self.week_start = day;
    }
}
