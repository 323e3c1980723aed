use serde::{Deserialize, Serialize};

// =============================================================================
// Message Types
// =============================================================================

/// Typed request from the UI adapter to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayRequest {
    CheckSession,
    SearchMovies { query: String },
    GetMovieDetails { movie_id: String },
    OpenLogin,
    OpenMoctale,
    GetPendingSearch,
    ClearPendingSearch,
}

/// Message from the coordinator to the page-context agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentMessage {
    Ping,
    CheckAuth,
    Search { query: String, page: u32 },
    GetDetails { slug: String },
}

/// Ephemeral reference to an open browser tab.
///
/// Never persisted; re-resolved on every routed request that needs the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHandle {
    pub id: u64,
    pub url: String,
}
