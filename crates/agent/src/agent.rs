//! The agent's message loop.

use std::sync::Arc;

use moctale_core::types::{AgentMessage, Envelope, Payload};

use crate::auth::{AuthCascade, DetachedPage, PageContext};
use crate::normalize;
use crate::upstream::UpstreamApi;

/// Handles coordinator messages inside a page context.
pub struct PageAgent {
    upstream: Arc<dyn UpstreamApi>,
    auth: AuthCascade,
}

impl PageAgent {
    /// Agent without page visibility; auth detection relies on the API probe.
    pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
        Self::with_context(upstream, Arc::new(DetachedPage))
    }

    /// Agent with a view of the hosting page.
    pub fn with_context(upstream: Arc<dyn UpstreamApi>, context: Arc<dyn PageContext>) -> Self {
        Self {
            auth: AuthCascade::standard(context, upstream.clone()),
            upstream,
        }
    }

    /// Answer one coordinator message. Upstream failures become failure
    /// envelopes; nothing escapes the page boundary as a fault.
    pub async fn handle(&self, message: AgentMessage) -> Envelope {
        match message {
            AgentMessage::Ping => Envelope::pong(),
            AgentMessage::CheckAuth => {
                Envelope::ok(Payload::Session(self.auth.resolve().await))
            }
            AgentMessage::Search { query, page } => {
                match self.upstream.search(&query, page).await {
                    Ok(doc) => Envelope::ok(Payload::Search(normalize::search_results(&doc))),
                    Err(e) => {
                        tracing::warn!(query = %query, error = %e, "search failed");
                        Envelope::from_error(&e)
                    }
                }
            }
            AgentMessage::GetDetails { slug } => match self.upstream.content(&slug).await {
                Ok(doc) => Envelope::ok(Payload::Details(normalize::details(&doc))),
                Err(e) => {
                    tracing::warn!(slug = %slug, error = %e, "details lookup failed");
                    Envelope::from_error(&e)
                }
            },
        }
    }
}
