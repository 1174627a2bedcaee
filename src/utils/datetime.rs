//! Release-date parsing
//!
//! The store lookup and the dioscope index both carry the release date of an
//! app's current version as a string. The store emits RFC3339
//! (`2015-03-10T20:21:13Z`); documents in the index may have been written by
//! other tools and sometimes carry fractional seconds, no timezone, or just a
//! date. Everything is normalised to `DateTime<Utc>` so comparisons are plain
//! timestamp ordering.
//!
//! # Usage
//!
//! ```rust
//! use dioscope_scheduler::utils::datetime::DateTimeParser;
//!
//! let released = DateTimeParser::parse_flexible("2015-03-10T20:21:13Z").unwrap();
//! let indexed = DateTimeParser::parse_flexible("2015-03-10 20:21:13").unwrap();
//! assert_eq!(released, indexed);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors that can occur during datetime parsing
#[derive(Error, Debug)]
pub enum DateTimeError {
    /// Invalid datetime format provided
    #[error("Invalid datetime format: '{input}' - expected RFC3339 (2015-03-10T20:21:13Z) or a naive UTC timestamp")]
    InvalidFormat { input: String },
}

/// Datetime parsing and formatting for release dates
pub struct DateTimeParser;

impl DateTimeParser {
    /// Parse a release date from the formats seen in lookups and the index
    ///
    /// Supports:
    /// - RFC3339 with timezone or offset: "2015-03-10T20:21:13Z", "2015-03-10T22:21:13+02:00"
    /// - RFC3339 with fractional seconds: "2015-03-10T20:21:13.000Z"
    /// - naive timestamps (assumed UTC): "2015-03-10 20:21:13", "2015-03-10T20:21:13"
    /// - bare dates (midnight UTC): "2015-03-10"
    pub fn parse_flexible(datetime_str: &str) -> Result<DateTime<Utc>, DateTimeError> {
        let trimmed = datetime_str.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z") {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive_formats = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
        ];

        for format in &naive_formats {
            if let Ok(naive_dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(DateTime::from_naive_utc_and_offset(naive_dt, Utc));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
            }
        }

        Err(DateTimeError::InvalidFormat {
            input: datetime_str.to_string(),
        })
    }

    /// Format a release date for log lines
    pub fn format_for_log(dt: &DateTime<Utc>) -> String {
        dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

/// Serde deserialization helper for release-date fields
///
/// Use with `#[serde(deserialize_with = "deserialize_datetime")]`.
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTimeParser::parse_flexible(&s).map_err(serde::de::Error::custom)
}
