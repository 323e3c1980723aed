#![deny(unused)]
//! Page-context agent for the Moctale relay.
//!
//! The agent runs with the user's ambient session: it performs the upstream
//! API calls, detects auth state through a probe cascade, and normalizes the
//! upstream response shapes before anything leaves the page boundary. The
//! hosted runtime binds agents to simulated tabs so the relay binary runs
//! end to end without a real browser.

pub mod agent;
pub mod auth;
pub mod hosted;
pub mod normalize;
pub mod upstream;

pub use agent::PageAgent;
pub use auth::{AuthCascade, AuthProbe, PageContext, ProbeOutcome};
pub use hosted::HostedRuntime;
pub use upstream::{HttpUpstream, StaticUpstream, UpstreamApi};
