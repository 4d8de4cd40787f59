/// Tools for managing itinerary items
///
/// Itinerary items are the activities that can be placed into the weekly
/// schedule grid. Removing an item also frees every slot it occupied.

use serde::{Deserialize, Serialize};
use crate::domain::{ItineraryId, ItineraryItem};
use crate::storage::TrackerStorage;
use crate::tools::ToolError;

/// Parameters for adding an itinerary item
#[derive(Debug, Deserialize)]
pub struct AddItemParams {
    pub name: String,
    pub description: Option<String>,
}

/// Response from adding an itinerary item
#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub success: bool,
    pub item_id: String,
    pub message: String,
}

/// Add a new itinerary item
pub fn add_itinerary_item<S: TrackerStorage>(
    storage: &S,
    params: AddItemParams,
) -> Result<AddItemResponse, ToolError> {
    let item = ItineraryItem::new(params.name, params.description)?;
    storage.create_item(&item)?;

    Ok(AddItemResponse {
        success: true,
        item_id: item.id.to_string(),
        message: format!("Added itinerary item '{}'", item.name),
    })
}

/// Parameters for updating an itinerary item
#[derive(Debug, Deserialize)]
pub struct UpdateItemParams {
    pub item_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Set to true to clear the description
    pub clear_description: Option<bool>,
}

/// Response from updating an itinerary item
#[derive(Debug, Serialize)]
pub struct UpdateItemResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing itinerary item
pub fn update_itinerary_item<S: TrackerStorage>(
    storage: &S,
    params: UpdateItemParams,
) -> Result<UpdateItemResponse, ToolError> {
    let item_id = parse_item_id(&params.item_id)?;

    let description = if params.clear_description.unwrap_or(false) {
        Some(None)
    } else {
        params.description.map(Some)
    };

    let mut item = storage.get_item(&item_id)?;
    item.update(params.name, description)?;
    storage.update_item(&item)?;

    Ok(UpdateItemResponse {
        success: true,
        message: format!("Updated itinerary item '{}'", item.name),
    })
}

/// Parameters for removing an itinerary item
#[derive(Debug, Deserialize)]
pub struct RemoveItemParams {
    pub item_id: String,
}

/// Response from removing an itinerary item
#[derive(Debug, Serialize)]
pub struct RemoveItemResponse {
    pub success: bool,
    pub message: String,
}

/// Remove an itinerary item, freeing any slots it occupied
pub fn remove_itinerary_item<S: TrackerStorage>(
    storage: &S,
    params: RemoveItemParams,
) -> Result<RemoveItemResponse, ToolError> {
    let item_id = parse_item_id(&params.item_id)?;

    let item = storage.get_item(&item_id)?;
    storage.delete_item(&item_id)?;

    Ok(RemoveItemResponse {
        success: true,
        message: format!("Removed itinerary item '{}'", item.name),
    })
}

/// Response from listing itinerary items
#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<ItineraryItem>,
}

/// List all itinerary items
pub fn list_itinerary_items<S: TrackerStorage>(
    storage: &S,
) -> Result<ListItemsResponse, ToolError> {
    Ok(ListItemsResponse {
        items: storage.list_items()?,
    })
}

/// Parse an itinerary item id string, mapping failures to a tool error
pub(crate) fn parse_item_id(raw: &str) -> Result<ItineraryId, ToolError> {
    ItineraryId::from_string(raw)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid itinerary item id '{}'", raw)))
}
