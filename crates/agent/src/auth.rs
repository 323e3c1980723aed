//! Auth state detection.
//!
//! A prioritized chain of capability probes. Each probe returns a definite
//! result or `Unknown`; the first definite result wins. If every probe comes
//! back `Unknown` the session is treated as signed out.

use std::sync::Arc;

use async_trait::async_trait;

use moctale_core::types::SessionStatus;

use crate::upstream::UpstreamApi;

/// Name of the session cookie the site sets on login.
pub const SESSION_COOKIE: &str = "moctale_session";

/// DOM marker present only for signed-in users.
pub const ACCOUNT_MENU_SELECTOR: &str = "[data-account-menu]";

/// What a single probe can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    LoggedIn(Option<String>),
    LoggedOut,
    Unknown,
}

/// One capability probe in the cascade.
#[async_trait]
pub trait AuthProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn probe(&self) -> ProbeOutcome;
}

/// What the agent can observe of the page it runs in.
///
/// Deliberately narrow: cookie presence and one marker lookup. There is no
/// DOM-scraping engine behind this; a detached agent sees nothing.
pub trait PageContext: Send + Sync {
    /// Cookie value, if readable from the page.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Whether a selector matches, if the DOM is readable at all.
    fn dom_marker(&self, selector: &str) -> Option<bool>;

    /// Display name shown in the page chrome, if any.
    fn display_name(&self) -> Option<String>;
}

/// Page context with no cookie or DOM visibility. Used when the agent is
/// hosted outside a real page; the cascade then falls through to the API
/// probe.
pub struct DetachedPage;

impl PageContext for DetachedPage {
    fn cookie(&self, _name: &str) -> Option<String> {
        None
    }

    fn dom_marker(&self, _selector: &str) -> Option<bool> {
        None
    }

    fn display_name(&self) -> Option<String> {
        None
    }
}

// =============================================================================
// Probes
// =============================================================================

/// Session cookie check. A visible session cookie means logged in; an
/// invisible one proves nothing (it may be HttpOnly), so absence is
/// `Unknown` rather than `LoggedOut`.
pub struct CookieProbe {
    context: Arc<dyn PageContext>,
}

impl CookieProbe {
    pub fn new(context: Arc<dyn PageContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl AuthProbe for CookieProbe {
    fn name(&self) -> &'static str {
        "cookie"
    }

    async fn probe(&self) -> ProbeOutcome {
        match self.context.cookie(SESSION_COOKIE) {
            Some(_) => ProbeOutcome::LoggedIn(None),
            None => ProbeOutcome::Unknown,
        }
    }
}

/// Account-menu marker check. The marker is rendered only for signed-in
/// users, so a readable DOM gives a definite answer either way.
pub struct DomProbe {
    context: Arc<dyn PageContext>,
}

impl DomProbe {
    pub fn new(context: Arc<dyn PageContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl AuthProbe for DomProbe {
    fn name(&self) -> &'static str {
        "dom"
    }

    async fn probe(&self) -> ProbeOutcome {
        match self.context.dom_marker(ACCOUNT_MENU_SELECTOR) {
            Some(true) => ProbeOutcome::LoggedIn(self.context.display_name()),
            Some(false) => ProbeOutcome::LoggedOut,
            None => ProbeOutcome::Unknown,
        }
    }
}

/// Profile endpoint check: the authoritative but most expensive probe.
pub struct ApiProbe {
    upstream: Arc<dyn UpstreamApi>,
}

impl ApiProbe {
    pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl AuthProbe for ApiProbe {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn probe(&self) -> ProbeOutcome {
        match self.upstream.profile().await {
            Ok(Some(profile)) => ProbeOutcome::LoggedIn(profile.username),
            Ok(None) => ProbeOutcome::LoggedOut,
            Err(e) => {
                tracing::debug!(error = %e, "profile probe failed");
                ProbeOutcome::Unknown
            }
        }
    }
}

// =============================================================================
// Cascade
// =============================================================================

/// Ordered probe chain.
pub struct AuthCascade {
    probes: Vec<Box<dyn AuthProbe>>,
}

impl AuthCascade {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Standard order: cheapest and least authoritative first.
    pub fn standard(context: Arc<dyn PageContext>, upstream: Arc<dyn UpstreamApi>) -> Self {
        Self::new()
            .with_probe(Box::new(CookieProbe::new(context.clone())))
            .with_probe(Box::new(DomProbe::new(context)))
            .with_probe(Box::new(ApiProbe::new(upstream)))
    }

    pub fn with_probe(mut self, probe: Box<dyn AuthProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Walk the chain until a probe answers definitely.
    pub async fn resolve(&self) -> SessionStatus {
        for probe in &self.probes {
            match probe.probe().await {
                ProbeOutcome::LoggedIn(username) => {
                    tracing::debug!(probe = probe.name(), "auth detected");
                    return SessionStatus::logged_in(username);
                }
                ProbeOutcome::LoggedOut => {
                    tracing::debug!(probe = probe.name(), "no auth detected");
                    return SessionStatus::logged_out();
                }
                ProbeOutcome::Unknown => continue,
            }
        }
        SessionStatus::logged_out()
    }
}

impl Default for AuthCascade {
    fn default() -> Self {
        Self::new()
    }
}
