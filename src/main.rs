#![deny(unused)]
//! Moctale relay - background coordinator for toolbar catalog search.
//!
//! Wires the coordinator (cache, locator, router, handoff slot) to a hosted
//! browser runtime and exposes the UI call contract over HTTP.

use std::sync::Arc;
use std::time::Duration;

use moctale_agent::{HostedRuntime, HttpUpstream};
use moctale_core::traits::{BrowserRuntime, HandoffStore};
use moctale_core::AppConfig;
use moctale_coordinator::{
    AgentLocator, CacheTtls, FileHandoffStore, RelayServer, RelayServerConfig, RequestRouter,
    ResponseCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    moctale_core::telemetry::configure_tracing()?;

    tracing::info!("starting moctale-relay v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default();

    // Hosted runtime with one tab already on the site, standing in for the
    // session the user established in their browser.
    let upstream = Arc::new(HttpUpstream::new(&config.site.api_base));
    let runtime = Arc::new(HostedRuntime::new(upstream));
    let tab = runtime.open_tab(&config.site.root_url).await?;
    tracing::info!(tab_id = tab.id, url = %tab.url, "seeded site tab");

    // Cache state is volatile; every process start begins from empty.
    let cache = Arc::new(ResponseCache::new(CacheTtls::from(&config.cache)));
    cache.clear();

    let handoff: Arc<dyn HandoffStore> = Arc::new(
        FileHandoffStore::new(&config.handoff.slot_path)
            .with_staleness(Duration::from_secs(config.handoff.staleness_secs)),
    );

    let locator = AgentLocator::new(runtime.clone(), &config.site, &config.agent);
    let router = Arc::new(RequestRouter::new(
        cache,
        locator,
        runtime,
        handoff,
        &config,
    ));

    let server_config = RelayServerConfig::from(&config.server);
    tracing::info!(
        host = %server_config.host,
        port = server_config.port,
        "relay surface initialized"
    );

    RelayServer::new(server_config, router).run().await?;

    Ok(())
}
