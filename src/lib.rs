/// Public library interface for the Habitron tracker server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod analytics;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{SqliteStorage, StorageError, TrackerStorage};
pub use analytics::{AnalyticsEngine, HabitCompletionRate, StreakPoint, StreakSummary};
pub use tools::*;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main tracker server that implements the MCP protocol
///
/// This server manages habits, the daily completion log, itinerary items
/// and the weekly schedule through a SQLite database, and exposes them as
/// tools over JSON-RPC.
pub struct HabitronServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
}

impl HabitronServer {
    /// Create a new tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habitron server with database: {:?}", db_path);

        // Initialize storage layer
        let storage = SqliteStorage::new(db_path)?;

        // Initialize analytics engine
        let analytics = AnalyticsEngine::new();

        Ok(Self { storage, analytics })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until the server is shut down or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let habits = self.storage.list_habits()?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        // Create and run the MCP server
        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
