//! End-to-end tests: coordinator routing through a hosted agent against a
//! scripted upstream catalog.

use std::sync::Arc;

use moctale_agent::upstream::ContentDocument;
use moctale_agent::{HostedRuntime, StaticUpstream};
use moctale_core::config::AppConfig;
use moctale_core::traits::BrowserRuntime;
use moctale_core::types::RelayRequest;
use moctale_coordinator::{
    AgentLocator, CacheTtls, MemoryHandoffStore, RequestRouter, ResponseCache,
};

fn dune() -> ContentDocument {
    let mut doc = ContentDocument::new("dune-2021", "Dune");
    doc.year = Some(2021);
    doc.is_show = Some(false);
    doc.image = Some("x.jpg".into());
    doc.description = Some("Spice.".into());
    doc.genres = Some(vec!["sci-fi".into()]);
    doc.duration = Some(155);
    doc
}

async fn build_relay(upstream: StaticUpstream, with_tab: bool) -> RequestRouter {
    let config = AppConfig::default();
    let runtime = Arc::new(HostedRuntime::new(Arc::new(upstream)));
    if with_tab {
        runtime.open_tab(&config.site.root_url).await.unwrap();
    }

    let cache = Arc::new(ResponseCache::new(CacheTtls::default()));
    let locator = AgentLocator::new(runtime.clone(), &config.site, &config.agent);
    let handoff = Arc::new(MemoryHandoffStore::new());
    RequestRouter::new(cache, locator, runtime, handoff, &config)
}

#[tokio::test(start_paused = true)]
async fn search_returns_normalized_items_with_pagination() {
    let upstream = StaticUpstream::new()
        .with_content(dune())
        .with_profile("alice")
        .with_total_pages(3);
    let relay = build_relay(upstream, true).await;

    let envelope = relay
        .handle(RelayRequest::SearchMovies {
            query: "Dune".into(),
        })
        .await;

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["items"][0]["id"], "dune-2021");
    assert_eq!(json["items"][0]["slug"], "dune-2021");
    assert_eq!(json["items"][0]["kind"], "movie");
    assert_eq!(json["items"][0]["detailPath"], "/content/dune-2021");
    assert_eq!(json["items"][0]["year"], 2021);
    assert_eq!(json["pagination"]["totalPages"], 3);
    assert_eq!(json["pagination"]["currentPage"], 1);
}

#[tokio::test(start_paused = true)]
async fn details_expose_extended_fields() {
    let relay = build_relay(StaticUpstream::new().with_content(dune()), true).await;

    let envelope = relay
        .handle(RelayRequest::GetMovieDetails {
            movie_id: "dune-2021".into(),
        })
        .await;

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["genres"][0], "sci-fi");
    assert_eq!(json["durationMinutes"], 155);
}

#[tokio::test(start_paused = true)]
async fn session_check_reflects_the_ambient_session() {
    let relay = build_relay(StaticUpstream::new().with_profile("alice"), true).await;

    let first = relay.handle(RelayRequest::CheckSession).await;
    let json = serde_json::to_value(&first).unwrap();
    assert_eq!(json["isLoggedIn"], true);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["cached"], false);

    // Served from the session-status cache within its lifetime.
    let second = relay.handle(RelayRequest::CheckSession).await;
    assert_eq!(serde_json::to_value(&second).unwrap()["cached"], true);
}

#[tokio::test(start_paused = true)]
async fn expired_session_reads_as_logged_out() {
    let relay = build_relay(StaticUpstream::new(), true).await;

    let envelope = relay.handle(RelayRequest::CheckSession).await;
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["isLoggedIn"], false);
}

#[tokio::test(start_paused = true)]
async fn without_a_site_tab_everything_routes_to_the_tab_error() {
    let relay = build_relay(StaticUpstream::new().with_content(dune()), false).await;

    let envelope = relay
        .handle(RelayRequest::SearchMovies {
            query: "dune".into(),
        })
        .await;

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "NO_MOCTALE_TAB");
}
