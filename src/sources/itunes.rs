//! iTunes source handler
//!
//! Talks to two public endpoints:
//! - the lookup API (`/lookup?bundleId=..` or `/lookup?id=..`), answering
//!   `{"resultCount": n, "results": [...]}`;
//! - the RSS generator (`/{country}/rss/topfreeapplications/limit=n/json`),
//!   answering `{"feed": {"entry": [...]}}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::traits::{FeedSource, LookupQuery, StoreLookup};
use crate::config::{HttpConfig, StoreConfig};
use crate::errors::{AppError, AppResult};
use crate::models::{FeedEntry, StoreRecord};
use crate::utils::{http_client, sanitize_base_url};

/// Which iTunes chart a feed is generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    TopFree,
    NewFree,
}

impl FeedKind {
    fn chart(&self) -> &'static str {
        match self {
            FeedKind::TopFree => "topfreeapplications",
            FeedKind::NewFree => "newfreeapplications",
        }
    }
}

/// Parameters of an RSS feed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub kind: FeedKind,
    pub limit: u32,
    pub genre: Option<u32>,
    pub country: String,
}

impl FeedRequest {
    pub fn new<S: Into<String>>(kind: FeedKind, limit: u32, country: S) -> Self {
        Self {
            kind,
            limit,
            genre: None,
            country: country.into(),
        }
    }

    pub fn with_genre(mut self, genre: Option<u32>) -> Self {
        self.genre = genre;
        self
    }

    /// Feed URL below `rss_base_url`
    pub fn to_url(&self, rss_base_url: &str) -> String {
        let mut url = format!(
            "{}/{}/rss/{}/limit={}",
            sanitize_base_url(rss_base_url),
            self.country,
            self.kind.chart(),
            self.limit
        );
        if let Some(genre) = self.genre {
            url.push_str(&format!("/genre={}", genre));
        }
        url.push_str("/json");
        url
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<StoreRecord>,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    feed: FeedBody,
}

#[derive(Debug, Deserialize)]
struct FeedBody {
    #[serde(default)]
    entry: OneOrMany<RawFeedEntry>,
}

/// iTunes collapses single-entry feeds into a bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFeedEntry {
    id: RawEntryId,
    #[serde(rename = "im:name")]
    name: Option<Label>,
}

#[derive(Debug, Deserialize)]
struct RawEntryId {
    attributes: RawEntryAttributes,
}

#[derive(Debug, Deserialize)]
struct RawEntryAttributes {
    #[serde(rename = "im:bundleId")]
    bundle_id: String,
}

#[derive(Debug, Deserialize)]
struct Label {
    label: String,
}

impl From<RawFeedEntry> for FeedEntry {
    fn from(raw: RawFeedEntry) -> Self {
        FeedEntry {
            bundle_id: raw.id.attributes.bundle_id,
            name: raw.name.map(|label| label.label),
        }
    }
}

/// Client for the iTunes lookup API and RSS feeds
pub struct ItunesClient {
    client: Client,
    lookup_url: String,
    rss_base_url: String,
}

impl ItunesClient {
    pub fn new(store: &StoreConfig, http: &HttpConfig) -> AppResult<Self> {
        let client = http_client::build_client(&http.user_agent, store.timeout())?;
        Ok(Self::with_client(client, store))
    }

    pub fn with_client(client: Client, store: &StoreConfig) -> Self {
        Self {
            client,
            lookup_url: store.lookup_url.clone(),
            rss_base_url: store.rss_base_url.clone(),
        }
    }

    /// URL of the feed described by `request`
    pub fn feed_url(&self, request: &FeedRequest) -> String {
        request.to_url(&self.rss_base_url)
    }

    fn lookup_request_url(&self, query: &LookupQuery, country: Option<&str>) -> AppResult<Url> {
        let mut params = vec![query.as_param()];
        if let Some(country) = country {
            params.push(("country", country.to_string()));
        }

        Url::parse_with_params(&self.lookup_url, &params).map_err(|e| {
            AppError::configuration(format!("Invalid lookup url '{}': {}", self.lookup_url, e))
        })
    }
}

#[async_trait]
impl StoreLookup for ItunesClient {
    async fn lookup(&self, query: &LookupQuery, country: Option<&str>) -> AppResult<Vec<StoreRecord>> {
        let url = self.lookup_request_url(query, country)?;
        debug!("Looking up {} ({})", query, url);

        let response = http_client::send(self.client.get(url.clone()), url.as_str()).await?;
        let body: LookupResponse = http_client::read_json(response, url.as_str(), "itunes_lookup").await?;

        debug!("Lookup of {} returned {} result(s)", query, body.results.len());
        Ok(body.results)
    }
}

#[async_trait]
impl FeedSource for ItunesClient {
    async fn fetch_feed(&self, url: &str) -> AppResult<Vec<FeedEntry>> {
        info!("Adding apps from iTunes ({})", url);

        let response = http_client::send(self.client.get(url), url).await?;
        let body: FeedResponse = http_client::read_json(response, url, "itunes_rss").await?;

        let entries: Vec<FeedEntry> = body
            .feed
            .entry
            .into_vec()
            .into_iter()
            .map(FeedEntry::from)
            .collect();

        debug!("Feed {} listed {} app(s)", url, entries.len());
        Ok(entries)
    }
}
