/// Tools for the weekly schedule
///
/// The schedule maps `"Mon-08:30"` style slots to itinerary items and carries
/// the grid settings (first slot time, slot length, week start day). Every
/// mutation loads the stored schedule, applies the change, and saves the
/// whole thing back.

use serde::{Deserialize, Serialize};
use chrono::{NaiveTime, Weekday};
use crate::domain::Slot;
use crate::storage::TrackerStorage;
use crate::tools::{itinerary::parse_item_id, ToolError};

/// Parameters for assigning an itinerary item to a slot
#[derive(Debug, Deserialize)]
pub struct AssignSlotParams {
    /// Slot key like "Mon-08:30"
    pub slot: String,
    pub item_id: String,
}

/// Response from a slot mutation
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub success: bool,
    pub message: String,
}

/// Put an itinerary item into a slot, replacing any previous occupant
pub fn assign_schedule_slot<S: TrackerStorage>(
    storage: &S,
    params: AssignSlotParams,
) -> Result<SlotResponse, ToolError> {
    let slot = Slot::from_key(&params.slot)?;
    let item_id = parse_item_id(&params.item_id)?;

    // The item must exist; slots never point at deleted items.
    let item = storage.get_item(&item_id)?;

    let mut schedule = storage.load_schedule()?;
    schedule.assign(slot.clone(), item_id);
    storage.save_schedule(&schedule)?;

    Ok(SlotResponse {
        success: true,
        message: format!("Scheduled '{}' at {}", item.name, slot),
    })
}

/// Parameters for clearing a slot
#[derive(Debug, Deserialize)]
pub struct ClearSlotParams {
    /// Slot key like "Mon-08:30"
    pub slot: String,
}

/// Empty a slot
pub fn clear_schedule_slot<S: TrackerStorage>(
    storage: &S,
    params: ClearSlotParams,
) -> Result<SlotResponse, ToolError> {
    let slot = Slot::from_key(&params.slot)?;

    let mut schedule = storage.load_schedule()?;
    let cleared = schedule.clear(&slot);
    storage.save_schedule(&schedule)?;

    let message = if cleared.is_some() {
        format!("Cleared slot {}", slot)
    } else {
        format!("Slot {} was already empty", slot)
    };

    Ok(SlotResponse {
        success: true,
        message,
    })
}

/// Parameters for changing grid settings
///
/// Omitted fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct ConfigureScheduleParams {
    /// First slot of each day (HH:MM)
    pub start_time: Option<String>,
    /// Slot length in minutes
    pub interval_minutes: Option<u32>,
    /// Day the displayed week starts on (e.g., "Sun")
    pub week_start: Option<String>,
}

/// Change the schedule grid settings
pub fn configure_schedule<S: TrackerStorage>(
    storage: &S,
    params: ConfigureScheduleParams,
) -> Result<SlotResponse, ToolError> {
    let mut schedule = storage.load_schedule()?;

    if let Some(raw) = params.start_time {
        let start_time = NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|_| {
            ToolError::InvalidParams(format!("Invalid time '{}', expected HH:MM", raw))
        })?;
        schedule.set_start_time(start_time);
    }

    if let Some(minutes) = params.interval_minutes {
        schedule.set_interval(minutes)?;
    }

    if let Some(raw) = params.week_start {
        let week_start: Weekday = raw
            .parse()
            .map_err(|_| ToolError::InvalidParams(format!("Unknown weekday '{}'", raw)))?;
        schedule.set_week_start(week_start);
    }

    storage.save_schedule(&schedule)?;

    Ok(SlotResponse {
        success: true,
        message: format!(
            "Schedule: {}-minute slots from {}, week starts {}",
            schedule.interval_minutes,
            schedule.start_time.format("%H:%M"),
            schedule.week_start
        ),
    })
}

/// One assigned slot in the schedule view
#[derive(Debug, Serialize)]
pub struct SlotAssignment {
    /// Slot key like "Mon-08:30"
    pub slot: String,
    pub item_id: String,
    pub item_name: String,
}

/// Response from viewing the schedule
#[derive(Debug, Serialize)]
pub struct ScheduleViewResponse {
    pub start_time: String,
    pub interval_minutes: u32,
    pub week_start: String,
    pub assignments: Vec<SlotAssignment>,
}

/// View the schedule settings and all assigned slots
pub fn view_schedule<S: TrackerStorage>(
    storage: &S,
) -> Result<ScheduleViewResponse, ToolError> {
    let schedule = storage.load_schedule()?;

    let mut assignments = Vec::new();
    for (slot, item_id) in &schedule.slots {
        let item = storage.get_item(item_id)?;
        assignments.push(SlotAssignment {
            slot: slot.key(),
            item_id: item_id.to_string(),
            item_name: item.name,
        });
    }
    assignments.sort_by(|a, b| a.slot.cmp(&b.slot));

    Ok(ScheduleViewResponse {
        start_time: schedule.start_time.format("%H:%M").to_string(),
        interval_minutes: schedule.interval_minutes,
        week_start: schedule.week_start.to_string(),
        assignments,
    })
}
