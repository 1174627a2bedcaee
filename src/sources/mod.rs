//! Upstream app catalogs
//!
//! - [`itunes::ItunesClient`]: store lookup endpoint and RSS feeds
//! - [`elasticsearch::ElasticsearchIndex`]: index of previously analysed apps

pub mod elasticsearch;
pub mod itunes;
pub mod traits;

pub use elasticsearch::ElasticsearchIndex;
pub use itunes::{FeedKind, FeedRequest, ItunesClient};
pub use traits::{CatalogIndex, FeedSource, LookupQuery, StoreLookup};
