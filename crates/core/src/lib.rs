#![deny(unused)]
//! Core types, traits, and error definitions for the Moctale relay.
//!
//! This crate provides the building blocks shared by the coordinator and the
//! page-context agent: the response envelope that crosses every boundary, the
//! browser-runtime and handoff-store seams, configuration, and mocks.

pub mod config;
pub mod error;
pub mod mocks;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
