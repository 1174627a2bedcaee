//! Catalog of previously analysed apps, read from an Elasticsearch index
//!
//! The dioscope index stores one `app` document per analysed bundle. Only
//! three fields matter for scheduling, and they are requested as doc-value
//! `fields`, which Elasticsearch always returns as arrays:
//!
//! ```json
//! {"hits": {"hits": [{"fields": {
//!     "bundleId.untouched": ["com.example.app"],
//!     "version": ["2.1"],
//!     "currentVersionReleaseDate": ["2015-03-10T20:21:13Z"]
//! }}]}}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info};

use super::traits::CatalogIndex;
use crate::config::{HttpConfig, IndexConfig};
use crate::errors::{AppError, AppResult};
use crate::models::{AppCatalogEntry, MAX_CATALOG_BATCH};
use crate::utils::datetime::DateTimeParser;
use crate::utils::{http_client, join_url};

const BUNDLE_ID_FIELD: &str = "bundleId.untouched";
const VERSION_FIELD: &str = "version";
const RELEASE_DATE_FIELD: &str = "currentVersionReleaseDate";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(default)]
    fields: HashMap<String, Vec<Value>>,
}

impl Hit {
    fn first_string(&self, field: &str) -> AppResult<String> {
        let value = self
            .fields
            .get(field)
            .and_then(|values| values.first())
            .ok_or_else(|| {
                AppError::parse(
                    "elasticsearch",
                    format!(
                        "hit {} is missing field '{}'",
                        self.id.as_deref().unwrap_or("?"),
                        field
                    ),
                )
            })?;

        Ok(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn into_entry(self) -> AppResult<AppCatalogEntry> {
        let bundle_id = self.first_string(BUNDLE_ID_FIELD)?;
        let version = self.first_string(VERSION_FIELD)?;
        let raw_date = self.first_string(RELEASE_DATE_FIELD)?;
        let release_date = DateTimeParser::parse_flexible(&raw_date)
            .map_err(|e| AppError::parse("elasticsearch", format!("{}: {}", bundle_id, e)))?;

        Ok(AppCatalogEntry {
            bundle_id,
            version,
            release_date,
        })
    }
}

/// Reads catalog entries from `{host}/{index}/_search`
pub struct ElasticsearchIndex {
    client: Client,
    search_url: String,
}

impl ElasticsearchIndex {
    pub fn new(index: &IndexConfig, http: &HttpConfig) -> AppResult<Self> {
        let client = http_client::build_client(&http.user_agent, index.timeout())?;
        Ok(Self::with_client(client, index))
    }

    pub fn with_client(client: Client, index: &IndexConfig) -> Self {
        Self {
            client,
            search_url: join_url(&index.host, &format!("{}/_search", index.index)),
        }
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    fn search_body(limit: usize) -> Value {
        json!({
            "size": limit,
            "_source": false,
            "fields": [BUNDLE_ID_FIELD, RELEASE_DATE_FIELD, VERSION_FIELD],
        })
    }
}

#[async_trait]
impl CatalogIndex for ElasticsearchIndex {
    async fn fetch_catalog(&self, limit: usize) -> AppResult<Vec<AppCatalogEntry>> {
        let limit = limit.min(MAX_CATALOG_BATCH);
        debug!("Querying {} for up to {} apps", self.search_url, limit);

        let request = self
            .client
            .post(&self.search_url)
            .json(&Self::search_body(limit));
        let response = http_client::send(request, &self.search_url).await?;
        let body: SearchResponse =
            http_client::read_json(response, &self.search_url, "elasticsearch").await?;

        let entries = body
            .hits
            .hits
            .into_iter()
            .take(limit)
            .map(Hit::into_entry)
            .collect::<AppResult<Vec<_>>>()?;

        info!("Loaded {} apps from index", entries.len());
        Ok(entries)
    }
}
