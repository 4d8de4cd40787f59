/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the tracker
/// 3. Sends JSON-RPC responses to stdout

use std::collections::HashMap;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{HabitronServer, ServerError};

/// MCP server that handles communication with clients
pub struct McpServer {
    /// The underlying tracker server
    tracker: HabitronServer,
    /// Whether the server has been initialized
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tracker: HabitronServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            // Read one line from stdin
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    // Process the line
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        // Write response + newline
                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        // Parse JSON-RPC request
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        Some(self.handle_request(request).await)
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "tools/list" => self.handle_tools_list(request).await,
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    async fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habitron".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::success(request.id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/list request
    async fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "habit_create".to_string(),
                description: "Create a new habit to track every day".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Name of the habit"},
                        "icon": {"type": "string", "description": "Short icon/emoji (optional)"}
                    },
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "habit_list".to_string(),
                description: "List all tracked habits".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "habit_update".to_string(),
                description: "Rename a habit or change its icon".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habit_id": {"type": "string", "description": "ID of the habit"},
                        "name": {"type": "string", "description": "New name (optional)"},
                        "icon": {"type": "string", "description": "New icon (optional)"}
                    },
                    "required": ["habit_id"]
                }),
            },
            ToolDefinition {
                name: "habit_delete".to_string(),
                description: "Delete a habit and scrub it from the daily log".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habit_id": {"type": "string", "description": "ID of the habit"}
                    },
                    "required": ["habit_id"]
                }),
            },
            ToolDefinition {
                name: "log_fetch".to_string(),
                description: "Fetch the completion log with streaks, ascending by date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "log_add_date".to_string(),
                description: "Start tracking a day (defaults to today) with a blank flag per habit".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "date": {"type": "string", "description": "Day to track (YYYY-MM-DD, optional - defaults to today)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "log_toggle".to_string(),
                description: "Toggle a habit's completion flag for a tracked day; streaks are recomputed".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "entry_id": {"type": "string", "description": "ID of the tracked day"},
                        "habit_id": {"type": "string", "description": "ID of the habit to toggle"}
                    },
                    "required": ["entry_id", "habit_id"]
                }),
            },
            ToolDefinition {
                name: "log_edit_date".to_string(),
                description: "Move a tracked day to a different calendar date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "entry_id": {"type": "string", "description": "ID of the tracked day"},
                        "date": {"type": "string", "description": "New date (YYYY-MM-DD)"}
                    },
                    "required": ["entry_id", "date"]
                }),
            },
            ToolDefinition {
                name: "log_delete".to_string(),
                description: "Stop tracking a day and drop its completions".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "entry_id": {"type": "string", "description": "ID of the tracked day"}
                    },
                    "required": ["entry_id"]
                }),
            },
            ToolDefinition {
                name: "itinerary_add".to_string(),
                description: "Add a schedulable itinerary item".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Name of the activity"},
                        "description": {"type": "string", "description": "Longer description (optional)"}
                    },
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "itinerary_update".to_string(),
                description: "Update an itinerary item's name or description".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "item_id": {"type": "string", "description": "ID of the item"},
                        "name": {"type": "string", "description": "New name (optional)"},
                        "description": {"type": "string", "description": "New description (optional)"},
                        "clear_description": {"type": "boolean", "description": "Clear the description (optional)"}
                    },
                    "required": ["item_id"]
                }),
            },
            ToolDefinition {
                name: "itinerary_remove".to_string(),
                description: "Remove an itinerary item and free its schedule slots".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "item_id": {"type": "string", "description": "ID of the item"}
                    },
                    "required": ["item_id"]
                }),
            },
            ToolDefinition {
                name: "itinerary_list".to_string(),
                description: "List all itinerary items".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "schedule_assign".to_string(),
                description: "Put an itinerary item into a weekly schedule slot".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "slot": {"type": "string", "description": "Slot key like 'Mon-08:30'"},
                        "item_id": {"type": "string", "description": "ID of the itinerary item"}
                    },
                    "required": ["slot", "item_id"]
                }),
            },
            ToolDefinition {
                name: "schedule_clear".to_string(),
                description: "Empty a weekly schedule slot".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "slot": {"type": "string", "description": "Slot key like 'Mon-08:30'"}
                    },
                    "required": ["slot"]
                }),
            },
            ToolDefinition {
                name: "schedule_configure".to_string(),
                description: "Change the schedule grid: start time, slot length, week start day".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "start_time": {"type": "string", "description": "First slot of each day (HH:MM, optional)"},
                        "interval_minutes": {"type": "number", "description": "Slot length in minutes (optional)"},
                        "week_start": {"type": "string", "description": "Day the week starts on, e.g. 'Sun' (optional)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "schedule_view".to_string(),
                description: "View schedule settings and every assigned slot".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "tracker_status".to_string(),
                description: "Current streak, best streak and completion totals".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "tracker_insights".to_string(),
                description: "Short textual insights about habits and streaks".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "chart_completion".to_string(),
                description: "Per-habit completion percentages for the completion chart".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "chart_streaks".to_string(),
                description: "Streak-per-day series for the streak chart".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
        ];

        JsonRpcResponse::success(request.id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let args = tool_params.arguments;
        let storage = self.tracker.storage();

        let result = match tool_params.name.as_str() {
            "habit_create" => wrap(tools::create_habit(
                storage,
                tools::CreateHabitParams {
                    name: req_str(&args, "name"),
                    icon: opt_str(&args, "icon"),
                },
            )),
            "habit_list" => wrap(tools::list_habits(storage)),
            "habit_update" => wrap(tools::update_habit(
                storage,
                tools::UpdateHabitParams {
                    habit_id: req_str(&args, "habit_id"),
                    name: opt_str(&args, "name"),
                    icon: opt_str(&args, "icon"),
                },
            )),
            "habit_delete" => wrap(tools::delete_habit(
                storage,
                tools::DeleteHabitParams {
                    habit_id: req_str(&args, "habit_id"),
                },
            )),
            "log_fetch" => wrap(tools::fetch_log(storage)),
            "log_add_date" => wrap(tools::add_log_date(
                storage,
                tools::AddDateParams {
                    date: opt_str(&args, "date"),
                },
            )),
            "log_toggle" => wrap(tools::toggle_completion(
                storage,
                tools::ToggleCompletionParams {
                    entry_id: req_str(&args, "entry_id"),
                    habit_id: req_str(&args, "habit_id"),
                },
            )),
            "log_edit_date" => wrap(tools::edit_log_date(
                storage,
                tools::EditDateParams {
                    entry_id: req_str(&args, "entry_id"),
                    date: req_str(&args, "date"),
                },
            )),
            "log_delete" => wrap(tools::delete_log_entry(
                storage,
                tools::DeleteEntryParams {
                    entry_id: req_str(&args, "entry_id"),
                },
            )),
            "itinerary_add" => wrap(tools::add_itinerary_item(
                storage,
                tools::AddItemParams {
                    name: req_str(&args, "name"),
                    description: opt_str(&args, "description"),
                },
            )),
            "itinerary_update" => wrap(tools::update_itinerary_item(
                storage,
                tools::UpdateItemParams {
                    item_id: req_str(&args, "item_id"),
                    name: opt_str(&args, "name"),
                    description: opt_str(&args, "description"),
                    clear_description: opt_bool(&args, "clear_description"),
                },
            )),
            "itinerary_remove" => wrap(tools::remove_itinerary_item(
                storage,
                tools::RemoveItemParams {
                    item_id: req_str(&args, "item_id"),
                },
            )),
            "itinerary_list" => wrap(tools::list_itinerary_items(storage)),
            "schedule_assign" => wrap(tools::assign_schedule_slot(
                storage,
                tools::AssignSlotParams {
                    slot: req_str(&args, "slot"),
                    item_id: req_str(&args, "item_id"),
                },
            )),
            "schedule_clear" => wrap(tools::clear_schedule_slot(
                storage,
                tools::ClearSlotParams {
                    slot: req_str(&args, "slot"),
                },
            )),
            "schedule_configure" => wrap(tools::configure_schedule(
                storage,
                tools::ConfigureScheduleParams {
                    start_time: opt_str(&args, "start_time"),
                    interval_minutes: args
                        .get("interval_minutes")
                        .and_then(|v| v.as_u64())
                        .map(|n| n as u32),
                    week_start: opt_str(&args, "week_start"),
                },
            )),
            "schedule_view" => wrap(tools::view_schedule(storage)),
            "tracker_status" => wrap(tools::get_status(storage)),
            "tracker_insights" => wrap(tools::get_insights(storage)),
            "chart_completion" => wrap(tools::completion_chart(storage)),
            "chart_streaks" => wrap(tools::streak_chart(storage)),
            _ => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
        };

        JsonRpcResponse::success(request.id, serde_json::to_value(result).unwrap())
    }
}

/// Render a tool outcome as an MCP tool result
///
/// Successful responses are returned as pretty JSON so clients can consume
/// the structured payload; failures become error results with the tool
/// error's message.
fn wrap<T: serde::Serialize>(outcome: Result<T, tools::ToolError>) -> ToolCallResult {
    match outcome {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => ToolCallResult::error(format!("Failed to serialize response: {}", e)),
        },
        Err(e) => {
            debug!("Tool call failed (code {}): {}", tool_error_to_json_rpc_code(&e), e);
            ToolCallResult::error(e.to_string())
        }
    }
}

/// Extract a required string argument (empty when missing; tools validate)
fn req_str(args: &HashMap<String, Value>, key: &str) -> String {
    args.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Extract an optional string argument
fn opt_str(args: &HashMap<String, Value>, key: &str) -> Option<String> {
    args.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Extract an optional boolean argument
fn opt_bool(args: &HashMap<String, Value>, key: &str) -> Option<bool> {
    args.get(key).and_then(|v| v.as_bool())
}
