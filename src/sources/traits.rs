//! Collaborator trait definitions
//!
//! The scheduler never talks HTTP directly. It goes through these narrow
//! interfaces, one per upstream service, so the scheduling runs can be driven
//! by in-memory fakes in tests.

use async_trait::async_trait;
use std::fmt;

use crate::errors::AppResult;
use crate::models::{AppCatalogEntry, FeedEntry, LookupOutcome, StoreRecord};

/// Identifier a store lookup is keyed by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    BundleId(String),
    AppId(u64),
}

impl LookupQuery {
    /// Query parameter name and value understood by the lookup endpoint
    pub fn as_param(&self) -> (&'static str, String) {
        match self {
            LookupQuery::BundleId(bundle_id) => ("bundleId", bundle_id.clone()),
            LookupQuery::AppId(app_id) => ("id", app_id.to_string()),
        }
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupQuery::BundleId(bundle_id) => write!(f, "bundle {}", bundle_id),
            LookupQuery::AppId(app_id) => write!(f, "app id {}", app_id),
        }
    }
}

/// Live lookup against the app store
#[async_trait]
pub trait StoreLookup: Send + Sync {
    /// Every record the store returns for `query`, optionally restricted to
    /// one storefront country. Transport failures and unreadable responses
    /// are errors; an empty result is not.
    async fn lookup(&self, query: &LookupQuery, country: Option<&str>) -> AppResult<Vec<StoreRecord>>;

    /// Zero-or-one lookup by bundle id
    async fn lookup_bundle(&self, bundle_id: &str, country: Option<&str>) -> AppResult<LookupOutcome> {
        let records = self
            .lookup(&LookupQuery::BundleId(bundle_id.to_string()), country)
            .await?;

        Ok(records
            .into_iter()
            .next()
            .map(LookupOutcome::Found)
            .unwrap_or(LookupOutcome::NotFound))
    }
}

/// Ordered list of apps published by a feed
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self, url: &str) -> AppResult<Vec<FeedEntry>>;
}

/// Index of previously analysed apps
#[async_trait]
pub trait CatalogIndex: Send + Sync {
    /// At most `limit` catalog entries
    async fn fetch_catalog(&self, limit: usize) -> AppResult<Vec<AppCatalogEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        assert_eq!(
            LookupQuery::BundleId("com.x.y".to_string()).as_param(),
            ("bundleId", "com.x.y".to_string())
        );
        assert_eq!(
            LookupQuery::AppId(284882215).as_param(),
            ("id", "284882215".to_string())
        );
        assert_eq!(LookupQuery::AppId(1).to_string(), "app id 1");
    }

    struct FixedStore(Vec<StoreRecord>);

    #[async_trait]
    impl StoreLookup for FixedStore {
        async fn lookup(&self, _query: &LookupQuery, _country: Option<&str>) -> AppResult<Vec<StoreRecord>> {
            Ok(self.0.clone())
        }
    }

    fn record(bundle_id: &str) -> StoreRecord {
        use chrono::{TimeZone, Utc};

        StoreRecord {
            bundle_id: bundle_id.to_string(),
            track_id: None,
            version: "1.0".to_string(),
            release_date: Utc.with_ymd_and_hms(2015, 3, 10, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_lookup_bundle_takes_first_record() {
        let store = FixedStore(vec![record("com.a"), record("com.b")]);
        let outcome = tokio_test::block_on(store.lookup_bundle("com.a", Some("de"))).unwrap();
        assert_eq!(outcome, LookupOutcome::Found(record("com.a")));
    }

    #[test]
    fn test_lookup_bundle_without_records_is_not_found() {
        let outcome = tokio_test::block_on(FixedStore(Vec::new()).lookup_bundle("com.a", None)).unwrap();
        assert_eq!(outcome, LookupOutcome::NotFound);
    }
}
