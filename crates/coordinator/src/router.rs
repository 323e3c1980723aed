//! Request router: the coordinator's cache-and-routing layer.

use std::sync::Arc;
use std::time::Duration;

use moctale_core::config::AppConfig;
use moctale_core::error::Result;
use moctale_core::traits::{BrowserRuntime, HandoffStore};
use moctale_core::types::{
    AgentMessage, Envelope, ErrorKind, Payload, PendingQuery, RelayRequest,
};

use crate::cache::{Category, ResponseCache};
use crate::locator::AgentLocator;

/// Routes typed UI requests through the cache to the page-context agent.
///
/// Every agent-bound operation follows the same pipeline: cache lookup, on
/// miss locate the tab and ensure the agent is present, forward the request,
/// cache only successes. Failures come back as envelopes untouched; there is
/// no retry and no partial caching. Concurrent identical misses may each
/// call the agent; the cache accepts the duplicate write instead of
/// coordinating a single-flight lock.
pub struct RequestRouter {
    cache: Arc<ResponseCache>,
    locator: AgentLocator,
    runtime: Arc<dyn BrowserRuntime>,
    handoff: Arc<dyn HandoffStore>,
    root_url: String,
    login_url: String,
    call_timeout: Duration,
}

impl RequestRouter {
    pub fn new(
        cache: Arc<ResponseCache>,
        locator: AgentLocator,
        runtime: Arc<dyn BrowserRuntime>,
        handoff: Arc<dyn HandoffStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            cache,
            locator,
            runtime,
            handoff,
            root_url: config.site.root_url.clone(),
            login_url: config.site.login_url.clone(),
            call_timeout: Duration::from_millis(config.agent.call_timeout_ms),
        }
    }

    /// Dispatch a typed request. The boundary where nothing is allowed to
    /// escape: an unexpected internal error becomes a failure envelope.
    pub async fn handle(&self, request: RelayRequest) -> Envelope {
        let outcome = match request {
            RelayRequest::CheckSession => self.check_session().await,
            RelayRequest::SearchMovies { query } => self.search_movies(&query).await,
            RelayRequest::GetMovieDetails { movie_id } => self.movie_details(&movie_id).await,
            RelayRequest::OpenLogin => self.open_login().await,
            RelayRequest::OpenMoctale => self.open_site().await,
            RelayRequest::GetPendingSearch => self.pending_search().await,
            RelayRequest::ClearPendingSearch => self.clear_pending_search().await,
        };

        match outcome {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "request handling failed");
                Envelope::fail(ErrorKind::InternalError, e.to_string())
            }
        }
    }

    /// Session state, cached under a single fixed key.
    pub async fn check_session(&self) -> Result<Envelope> {
        self.via_agent(Category::SessionStatus, &["status"], AgentMessage::CheckAuth)
            .await
    }

    /// Catalog search. The query is normalized before keying so equivalent
    /// queries share a cache slot.
    pub async fn search_movies(&self, query: &str) -> Result<Envelope> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(Envelope::fail(
                ErrorKind::InvalidQuery,
                "search query must not be empty",
            ));
        }

        self.via_agent(
            Category::SearchResults,
            &[&normalized],
            AgentMessage::Search {
                query: normalized.clone(),
                page: 1,
            },
        )
        .await
    }

    /// Item details, cached by raw id.
    pub async fn movie_details(&self, movie_id: &str) -> Result<Envelope> {
        if movie_id.trim().is_empty() {
            return Ok(Envelope::fail(
                ErrorKind::InvalidId,
                "movie id must not be empty",
            ));
        }

        self.via_agent(
            Category::ItemDetails,
            &[movie_id],
            AgentMessage::GetDetails {
                slug: movie_id.to_string(),
            },
        )
        .await
    }

    /// Open the login page. Fire-and-forget: success once the call is issued.
    pub async fn open_login(&self) -> Result<Envelope> {
        if let Err(e) = self.runtime.open_tab(&self.login_url).await {
            tracing::warn!(error = %e, "login tab open failed");
        }
        Ok(Envelope::ack())
    }

    /// Focus an existing site tab, or open one at the site root.
    pub async fn open_site(&self) -> Result<Envelope> {
        match self.locator.locate_tab().await {
            Some(tab) => {
                if let Err(e) = self.runtime.focus_tab(&tab).await {
                    tracing::warn!(tab_id = tab.id, error = %e, "tab focus failed");
                }
            }
            None => {
                if let Err(e) = self.runtime.open_tab(&self.root_url).await {
                    tracing::warn!(error = %e, "site tab open failed");
                }
            }
        }
        Ok(Envelope::ack())
    }

    /// Read the pending-search slot, absent if stale or missing.
    pub async fn pending_search(&self) -> Result<Envelope> {
        let query = self.handoff.read_if_fresh().await?;
        Ok(Envelope::ok(Payload::Pending(PendingQuery { query })))
    }

    /// Drop the pending-search slot.
    pub async fn clear_pending_search(&self) -> Result<Envelope> {
        self.handoff.clear().await?;
        Ok(Envelope::ack())
    }

    /// Out-of-band trigger path: stash a query for the next UI activation.
    /// Runs fully independently of any in-flight request.
    pub async fn stash_pending_search(&self, query: &str) -> Result<Envelope> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Envelope::fail(
                ErrorKind::InvalidQuery,
                "pending search query must not be empty",
            ));
        }
        self.handoff.write(trimmed).await?;
        Ok(Envelope::ack())
    }

    /// Shared pipeline for agent-bound requests.
    async fn via_agent(
        &self,
        category: Category,
        key_args: &[&str],
        message: AgentMessage,
    ) -> Result<Envelope> {
        if let Some(hit) = self.cache.get(category, key_args) {
            tracing::debug!(category = %category, "cache hit");
            return Ok(hit.into_cached());
        }

        let Some(tab) = self.locator.locate_tab().await else {
            return Ok(Envelope::fail(
                ErrorKind::NoMoctaleTab,
                "no open Moctale tab; open the site and retry",
            ));
        };

        if !self.locator.ensure_agent(&tab).await {
            return Ok(Envelope::fail(
                ErrorKind::InjectionFailed,
                "could not install the agent in the Moctale tab",
            ));
        }

        let call = self.runtime.send_message(&tab, message);
        let reply = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::warn!(category = %category, error = %e, "agent call failed");
                return Ok(Envelope::from_error(&e));
            }
            Err(_) => {
                return Ok(Envelope::fail(
                    ErrorKind::NetworkError,
                    "agent call timed out",
                ));
            }
        };

        // Only success paths ever write the cache.
        if reply.is_success() {
            self.cache.put(category, key_args, reply.clone());
        }
        Ok(reply)
    }
}
