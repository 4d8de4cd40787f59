/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents something the
/// user wants to do every day, along with its validation rules.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{DomainError, HabitId};

/// A habit the user tracks day by day
///
/// Each habit carries a display name and a short icon (typically a single
/// emoji) shown next to it in clients. Habits are columns of the daily log:
/// every tracked day records one completion flag per habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read 20 pages")
    pub name: String,
    /// Short icon shown next to the name (e.g., "⭐")
    pub icon: String,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    pub fn new(name: String, icon: String) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_icon(&icon)?;

        Ok(Self {
            id: HabitId::new(),
            name,
            icon,
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading habits from the database.
    pub fn from_existing(
        id: HabitId,
        name: String,
        icon: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            icon,
            created_at,
        }
    }

    /// Update the habit's properties with validation
    pub fn update(
        &mut self,
        name: Option<String>,
        icon: Option<String>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_icon) = icon {
            Self::validate_icon(new_icon)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_icon) = icon {
            self.icon = new_icon;
        }

        Ok(())
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }

    /// Validate the icon field
    fn validate_icon(icon: &str) -> Result<(), DomainError> {
        if icon.chars().count() > 8 {
            return Err(DomainError::InvalidValue {
                message: "Icon cannot be longer than 8 characters".to_string()
            });
        }
        Ok(())
    }
}
