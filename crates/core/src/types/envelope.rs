use serde::Serialize;

use super::media::{MediaItem, Pagination};
use crate::error::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Error tag carried by failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidQuery,
    InvalidId,
    NoMoctaleTab,
    InjectionFailed,
    CommunicationError,
    NetworkError,
    Unauthorized,
    InternalError,
}

// =============================================================================
// Payloads
// =============================================================================

/// Session state as detected by the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SessionStatus {
    pub fn logged_in(username: Option<String>) -> Self {
        Self {
            is_logged_in: true,
            username,
        }
    }

    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            username: None,
        }
    }
}

/// One page of normalized search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub items: Vec<MediaItem>,
    pub pagination: Pagination,
}

/// A single normalized item plus the extended fields only the detail
/// endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetails {
    #[serde(flatten)]
    pub item: MediaItem,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// Liveness probe reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pong {
    pub pong: bool,
}

/// Result of reading the pending-search slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingQuery {
    pub query: Option<String>,
}

/// Bare acknowledgement for fire-and-forget operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ack {}

/// Category-specific success payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Session(SessionStatus),
    Search(SearchResults),
    Details(MediaDetails),
    Pending(PendingQuery),
    Pong(Pong),
    Ack(Ack),
}

// =============================================================================
// Envelope
// =============================================================================

/// Successful response half of the envelope union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Success {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Payload,
    pub cached: bool,
}

/// Failure half of the envelope union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: ErrorKind,
    pub message: String,
}

/// The uniform result shape returned across every boundary.
///
/// Exactly one of the two shapes: `{success:true, ...payload, cached}` or
/// `{success:false, error, message}`. Failures are values, never faults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(Success),
    Failure(Failure),
}

impl Envelope {
    /// Wrap a payload in a success envelope.
    pub fn ok(payload: Payload) -> Self {
        Self::Success(Success {
            success: true,
            payload,
            cached: false,
        })
    }

    /// Success envelope with no payload fields.
    pub fn ack() -> Self {
        Self::ok(Payload::Ack(Ack {}))
    }

    /// Liveness reply.
    pub fn pong() -> Self {
        Self::ok(Payload::Pong(Pong { pong: true }))
    }

    /// Build a failure envelope.
    pub fn fail(error: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(Failure {
            success: false,
            error,
            message: message.into(),
        })
    }

    /// Convert an internal error into the failure envelope it surfaces as.
    pub fn from_error(err: &Error) -> Self {
        Self::fail(err.kind(), err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_pong(&self) -> bool {
        matches!(
            self,
            Self::Success(Success {
                payload: Payload::Pong(Pong { pong: true }),
                ..
            })
        )
    }

    /// The success payload, if any.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Success(s) => Some(&s.payload),
            Self::Failure(_) => None,
        }
    }

    /// The failure kind, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f.error),
        }
    }

    /// Mark a success envelope as served from cache.
    pub fn into_cached(self) -> Self {
        match self {
            Self::Success(mut s) => {
                s.cached = true;
                Self::Success(s)
            }
            failure => failure,
        }
    }
}
