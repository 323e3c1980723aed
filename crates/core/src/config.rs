use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub cache: CacheConfig,
    pub agent: AgentConfig,
    pub handoff: HandoffConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub enable_tracing: bool,
}

/// Target-site locations. Origins are an exact scheme+host set, not
/// substring patterns.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub origins: Vec<String>,
    pub root_url: String,
    pub login_url: String,
    pub api_base: String,
}

/// Per-category cache lifetimes, in seconds. A category without an explicit
/// value falls back to `default_ttl_secs`.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub session_status_ttl_secs: Option<u64>,
    pub search_results_ttl_secs: Option<u64>,
    pub item_details_ttl_secs: Option<u64>,
    pub default_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// How long the liveness probe waits before assuming the agent is absent.
    pub probe_timeout_ms: u64,
    /// Settle delay after injecting the agent into a tab.
    pub settle_delay_ms: u64,
    /// Timeout on each routed agent call.
    pub call_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HandoffConfig {
    /// A pending search older than this is treated as absent.
    pub staleness_secs: u64,
    /// Durable slot location.
    pub slot_path: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("MOCTALE_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__SERVER__PORT=3000 to app.server.port
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Load from files/env, falling back to defaults when nothing is
    /// configured.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "no usable configuration found, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 3000,
                enable_cors: true,
                enable_tracing: true,
            },
            site: SiteConfig {
                origins: vec![
                    "https://moctale.com".into(),
                    "https://www.moctale.com".into(),
                ],
                root_url: "https://moctale.com/".into(),
                login_url: "https://moctale.com/login".into(),
                api_base: "https://moctale.com".into(),
            },
            cache: CacheConfig {
                session_status_ttl_secs: Some(60),
                search_results_ttl_secs: Some(300),
                item_details_ttl_secs: Some(900),
                default_ttl_secs: 300,
            },
            agent: AgentConfig {
                probe_timeout_ms: 800,
                settle_delay_ms: 250,
                call_timeout_ms: 10_000,
            },
            handoff: HandoffConfig {
                staleness_secs: 300,
                slot_path: "data/pending_search.json".into(),
            },
        }
    }
}
