//! Type definitions shared across the relay.
//!
//! The envelope is the single shape crossing every boundary
//! (agent -> coordinator, coordinator -> UI); the message types mirror the
//! cross-context wire contract.

pub mod envelope;
pub mod media;
pub mod message;

pub use envelope::*;
pub use media::*;
pub use message::*;
