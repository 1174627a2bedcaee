use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::datetime::deserialize_datetime;

/// `jobInfo.appType` seeded by every template
pub const APP_STORE_APP: &str = "AppStoreApp";

/// Upper bound on catalog entries processed by one version-diff run
pub const MAX_CATALOG_BATCH: usize = 1000;

/// Category of analysis requested; selects the default template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    #[default]
    Run,
    Dioscope,
}

impl JobKind {
    /// Resolve a kind name. Anything other than `dioscope` is a run job.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dioscope" => JobKind::Dioscope,
            _ => JobKind::Run,
        }
    }

    /// Descriptor `type` emitted for this kind
    pub fn job_type(&self) -> JobType {
        match self {
            JobKind::Run => JobType::RunApp,
            JobKind::Dioscope => JobType::Dioscope,
        }
    }
}

/// Descriptor `type` as understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    RunApp,
    Dioscope,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::RunApp => "run_app",
            JobType::Dioscope => "dioscope",
        }
    }
}

/// Lifecycle state of a job. The scheduler only ever creates pending jobs;
/// later states are owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
        }
    }
}

/// Identifier assigned by the backend to a submitted job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Previously indexed app: last known version and its release date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCatalogEntry {
    #[serde(rename = "bundleId")]
    pub bundle_id: String,
    /// Display only; versions are never compared
    pub version: String,
    #[serde(rename = "releaseDate")]
    pub release_date: DateTime<Utc>,
}

/// App record as returned by the store lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    #[serde(rename = "bundleId")]
    pub bundle_id: String,
    #[serde(rename = "trackId", default)]
    pub track_id: Option<u64>,
    pub version: String,
    #[serde(
        rename = "currentVersionReleaseDate",
        deserialize_with = "deserialize_datetime"
    )]
    pub release_date: DateTime<Utc>,
}

/// Result of a live lookup for one identifier. Absence is an ordinary
/// outcome (app pulled from the store or unavailable in the country).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(StoreRecord),
    NotFound,
}

/// One app listed by an RSS feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub bundle_id: String,
    pub name: Option<String>,
}

/// Aggregated result of a scheduling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Jobs the run decided to schedule, including ones whose submission failed
    pub scheduled: usize,
    /// True only if nothing aborted the run and every submission succeeded
    pub success: bool,
}

impl RunReport {
    pub fn new(scheduled: usize, success: bool) -> Self {
        Self { scheduled, success }
    }

    pub fn failed(scheduled: usize) -> Self {
        Self {
            scheduled,
            success: false,
        }
    }
}
