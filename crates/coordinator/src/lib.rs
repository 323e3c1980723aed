#![deny(unused)]
//! Background coordinator for the Moctale relay.
//!
//! Owns the time-bounded response cache, routes typed UI requests to the
//! page-context agent, manages the agent's lifecycle in the target tab, and
//! keeps the durable pending-search handoff slot.

pub mod cache;
pub mod handoff;
pub mod locator;
pub mod router;
pub mod server;

pub use cache::{CacheTtls, Category, ResponseCache};
pub use handoff::{FileHandoffStore, MemoryHandoffStore};
pub use locator::AgentLocator;
pub use router::RequestRouter;
pub use server::{RelayServer, RelayServerConfig};
