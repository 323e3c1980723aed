//! Upstream catalog API.
//!
//! Authentication is ambient: the session cookie already lives in the
//! browser, and no credential ever passes through the relay.

use async_trait::async_trait;
use serde::Deserialize;

use moctale_core::{Error, Result};

// =============================================================================
// Raw upstream shapes
// =============================================================================

/// One catalog entry exactly as upstream returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDocument {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub is_show: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub rating_count: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl ContentDocument {
    /// Minimal document; optional fields start empty.
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            year: None,
            is_show: None,
            image: None,
            cover: None,
            rating: None,
            rating_count: None,
            description: None,
            genres: None,
            duration: None,
        }
    }
}

/// Raw search page from `GET /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchDocument {
    pub total_pages: u32,
    pub current_page: u32,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub previous_page: Option<u32>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub data: Vec<ContentDocument>,
}

/// Raw profile from `GET /api/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDocument {
    #[serde(default)]
    pub username: Option<String>,
}

// =============================================================================
// Upstream trait
// =============================================================================

/// The three upstream endpoints the agent consumes.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchDocument>;

    async fn content(&self, slug: &str) -> Result<ContentDocument>;

    /// `Ok(None)` means the ambient session is missing or expired (401/403);
    /// transport problems are errors.
    async fn profile(&self) -> Result<Option<ProfileDocument>>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// Reqwest-backed upstream client.
pub struct HttpUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstream {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn transport_error(e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(e.to_string())
        } else {
            Error::network(e.to_string())
        }
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.map_err(Self::transport_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::unauthorized(format!("upstream returned {}", status)));
        }
        if !status.is_success() {
            return Err(Error::network(format!("upstream returned {}", status)));
        }

        response.json().await.map_err(Self::transport_error)
    }
}

#[async_trait]
impl UpstreamApi for HttpUpstream {
    async fn search(&self, query: &str, page: u32) -> Result<SearchDocument> {
        let request = self
            .client
            .get(format!("{}/api/search", self.base_url))
            .query(&[("q", query), ("page", &page.to_string())]);
        self.execute(request).await
    }

    async fn content(&self, slug: &str) -> Result<ContentDocument> {
        let request = self
            .client
            .get(format!("{}/api/content/{}", self.base_url, slug));
        self.execute(request).await
    }

    async fn profile(&self) -> Result<Option<ProfileDocument>> {
        let request = self.client.get(format!("{}/api/me", self.base_url));
        match self.execute(request).await {
            Ok(profile) => Ok(Some(profile)),
            Err(Error::Unauthorized(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// =============================================================================
// Scripted implementation
// =============================================================================

/// Fixed catalog for tests and offline demos.
pub struct StaticUpstream {
    catalog: Vec<ContentDocument>,
    profile: Option<ProfileDocument>,
    total_pages: u32,
}

impl StaticUpstream {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            profile: None,
            total_pages: 1,
        }
    }

    pub fn with_content(mut self, doc: ContentDocument) -> Self {
        self.catalog.push(doc);
        self
    }

    pub fn with_profile(mut self, username: &str) -> Self {
        self.profile = Some(ProfileDocument {
            username: Some(username.to_string()),
        });
        self
    }

    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = total_pages;
        self
    }
}

impl Default for StaticUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamApi for StaticUpstream {
    async fn search(&self, query: &str, page: u32) -> Result<SearchDocument> {
        let needle = query.to_lowercase();
        let data: Vec<ContentDocument> = self
            .catalog
            .iter()
            .filter(|doc| doc.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        Ok(SearchDocument {
            total_pages: self.total_pages,
            current_page: page,
            next_page: (page < self.total_pages).then(|| page + 1),
            previous_page: (page > 1).then(|| page - 1),
            count: Some(data.len() as u64),
            data,
        })
    }

    async fn content(&self, slug: &str) -> Result<ContentDocument> {
        self.catalog
            .iter()
            .find(|doc| doc.slug == slug)
            .cloned()
            .ok_or_else(|| Error::network(format!("upstream returned 404 for slug {}", slug)))
    }

    async fn profile(&self) -> Result<Option<ProfileDocument>> {
        Ok(self.profile.clone())
    }
}
