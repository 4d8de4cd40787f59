/// ItineraryItem entity for the weekly planner
///
/// Itinerary items are named activities (with an optional description) that
/// can be placed into schedule slots. They are unrelated to streak
/// computation.

use serde::{Deserialize, Serialize};
use crate::domain::{DomainError, ItineraryId};

/// A schedulable activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Unique identifier for this item
    pub id: ItineraryId,
    /// Display name (e.g., "Gym", "Deep work block")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
}

impl ItineraryItem {
    /// Create a new itinerary item with validation
    pub fn new(name: String, description: Option<String>) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;

        Ok(Self {
            id: ItineraryId::new(),
            name,
            description,
        })
    }

    /// Create an item from existing data (used when loading from database)
    pub fn from_existing(id: ItineraryId, name: String, description: Option<String>) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    /// Update the item's properties with validation
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_description) = description {
            Self::validate_description(new_description)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }

        Ok(())
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidItineraryItem(
                "Itinerary item name cannot be empty".to_string()
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidItineraryItem(
                "Itinerary item name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.len() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string()
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_item() {
        let item = ItineraryItem::new("Gym".to_string(), Some("Leg day".to_string()));

        assert!(item.is_ok());
        let item = item.unwrap();
        assert_eq!(item.name, "Gym");
        assert_eq!(item.description.as_deref(), Some("Leg day"));
    }

    #[test]
    fn test_empty_name_invalid() {
        let result = ItineraryItem::new("   ".to_string(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_clears_description() {
        let mut item = ItineraryItem::new("Gym".to_string(), Some("Leg day".to_string())).unwrap();
        item.update(None, Some(None)).unwrap();
        assert!(item.description.is_none());
    }
}
