//! In-memory collaborators shared by the scheduling tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use dioscope_scheduler::backend::JobQueue;
use dioscope_scheduler::errors::{AppError, AppResult};
use dioscope_scheduler::job::JobDescriptor;
use dioscope_scheduler::models::{AppCatalogEntry, FeedEntry, JobId, StoreRecord};
use dioscope_scheduler::scheduler::JobScheduler;
use dioscope_scheduler::sources::{CatalogIndex, FeedSource, LookupQuery, StoreLookup};

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 3, 10, 20, 21, 13).unwrap()
}

pub fn entry(bundle_id: &str, version: &str, release_date: DateTime<Utc>) -> AppCatalogEntry {
    AppCatalogEntry {
        bundle_id: bundle_id.to_string(),
        version: version.to_string(),
        release_date,
    }
}

pub fn record(bundle_id: &str, version: &str, release_date: DateTime<Utc>) -> StoreRecord {
    StoreRecord {
        bundle_id: bundle_id.to_string(),
        track_id: None,
        version: version.to_string(),
        release_date,
    }
}

pub fn later(seconds: i64) -> DateTime<Utc> {
    base_date() + Duration::seconds(seconds)
}

fn query_key(query: &LookupQuery) -> String {
    match query {
        LookupQuery::BundleId(bundle_id) => bundle_id.clone(),
        LookupQuery::AppId(app_id) => app_id.to_string(),
    }
}

/// How a scripted lookup fails
#[derive(Debug, Clone, Copy)]
pub enum LookupFailure {
    Transport,
    Status(u16),
    Parse,
}

impl LookupFailure {
    fn to_error(self, key: &str) -> AppError {
        let url = format!("http://store.test/lookup?{}", key);
        match self {
            LookupFailure::Transport => AppError::transport(url, "connection refused"),
            LookupFailure::Status(status) => AppError::http_status(url, status, "unavailable"),
            LookupFailure::Parse => AppError::parse("itunes_lookup", format!("{}: expected value", url)),
        }
    }
}

/// Store lookup answering from a fixed table, recording every call
#[derive(Default)]
pub struct FakeStore {
    records: HashMap<String, Vec<StoreRecord>>,
    failures: HashMap<String, LookupFailure>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookups for `key` return `records`
    pub fn with_records(mut self, key: &str, records: Vec<StoreRecord>) -> Self {
        self.records.insert(key.to_string(), records);
        self
    }

    pub fn with_record(self, record: StoreRecord) -> Self {
        let key = record.bundle_id.clone();
        self.with_records(&key, vec![record])
    }

    /// Lookups for `key` fail with `failure`
    pub fn with_failure(mut self, key: &str, failure: LookupFailure) -> Self {
        self.failures.insert(key.to_string(), failure);
        self
    }

    pub fn with_transport_failure(self, key: &str) -> Self {
        self.with_failure(key, LookupFailure::Transport)
    }

    /// Lookups for `key` answer with a body that cannot be decoded
    pub fn with_parse_failure(self, key: &str) -> Self {
        self.with_failure(key, LookupFailure::Parse)
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn looked_up(&self) -> Vec<String> {
        self.calls().into_iter().map(|(key, _)| key).collect()
    }
}

#[async_trait]
impl StoreLookup for FakeStore {
    async fn lookup(&self, query: &LookupQuery, country: Option<&str>) -> AppResult<Vec<StoreRecord>> {
        let key = query_key(query);
        self.calls
            .lock()
            .unwrap()
            .push((key.clone(), country.map(str::to_string)));

        if let Some(failure) = self.failures.get(&key) {
            return Err(failure.to_error(&key));
        }

        Ok(self.records.get(&key).cloned().unwrap_or_default())
    }
}

/// Job queue that keeps every submitted descriptor
#[derive(Default)]
pub struct RecordingQueue {
    rejected: HashSet<String>,
    submitted: Mutex<Vec<JobDescriptor>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions for `bundle_id` are rejected by the backend
    pub fn rejecting(mut self, bundle_id: &str) -> Self {
        self.rejected.insert(bundle_id.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<JobDescriptor> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_bundles(&self) -> Vec<String> {
        self.submitted()
            .iter()
            .filter_map(|job| job.bundle_id().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn submit_job(&self, job: &JobDescriptor) -> AppResult<JobId> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(job.clone());

        let bundle_id = job.bundle_id().unwrap_or_default();
        if self.rejected.contains(bundle_id) {
            return Err(AppError::http_status("http://backend.test/jobs", 500, "rejected"));
        }

        Ok(JobId(format!("job-{}", submitted.len())))
    }
}

/// Feed returning a fixed list, or failing
#[derive(Default)]
pub struct FakeFeed {
    entries: Vec<FeedEntry>,
    unreachable: bool,
}

impl FakeFeed {
    pub fn with_bundles(bundle_ids: &[&str]) -> Self {
        Self {
            entries: bundle_ids
                .iter()
                .map(|bundle_id| FeedEntry {
                    bundle_id: bundle_id.to_string(),
                    name: None,
                })
                .collect(),
            unreachable: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            entries: Vec::new(),
            unreachable: true,
        }
    }
}

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch_feed(&self, url: &str) -> AppResult<Vec<FeedEntry>> {
        if self.unreachable {
            return Err(AppError::http_status(url, 503, "unavailable"));
        }
        Ok(self.entries.clone())
    }
}

/// Index returning a fixed catalog and remembering the requested limit
#[derive(Default)]
pub struct FakeIndex {
    entries: Vec<AppCatalogEntry>,
    unreachable: bool,
    requested_limit: Mutex<Option<usize>>,
}

impl FakeIndex {
    pub fn with_entries(entries: Vec<AppCatalogEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn requested_limit(&self) -> Option<usize> {
        *self.requested_limit.lock().unwrap()
    }
}

#[async_trait]
impl CatalogIndex for FakeIndex {
    async fn fetch_catalog(&self, limit: usize) -> AppResult<Vec<AppCatalogEntry>> {
        *self.requested_limit.lock().unwrap() = Some(limit);
        if self.unreachable {
            return Err(AppError::transport("http://index.test/_search", "timed out"));
        }
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}

pub fn scheduler_with(queue: Arc<RecordingQueue>) -> JobScheduler {
    JobScheduler::new(queue)
}
