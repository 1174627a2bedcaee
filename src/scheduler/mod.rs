//! Job scheduling runs
//!
//! [`JobScheduler`] turns bundle ids coming from the different catalogs into
//! submitted jobs:
//!
//! - a single explicit bundle id ([`JobScheduler::schedule_bundle`])
//! - a numeric App Store id resolved by lookup ([`JobScheduler::schedule_app_id`])
//! - every app of an RSS feed ([`JobScheduler::schedule_feed`])
//! - apps whose store release is newer than the indexed one
//!   ([`JobScheduler::schedule_new_versions`], see `version_diff`)
//!
//! Everything runs sequentially: each lookup and submission is awaited before
//! the next one starts.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::backend::JobQueue;
use crate::errors::{AppError, AppResult};
use crate::job::{BundleJobRequest, JobBuilder, JobDescriptor, JobOptions};
use crate::models::{JobId, JobKind, RunReport, StoreRecord};
use crate::sources::{FeedSource, LookupQuery, StoreLookup};

pub mod version_diff;

pub use version_diff::is_newer_release;

pub struct JobScheduler {
    queue: Arc<dyn JobQueue>,
}

impl JobScheduler {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Build a job of `kind` from `overrides` and submit it
    pub async fn schedule_job(
        &self,
        kind: JobKind,
        overrides: &Map<String, Value>,
    ) -> AppResult<JobId> {
        let job = JobBuilder::build(kind, overrides);
        self.submit(&job).await
    }

    /// Build the job for one bundle id and submit it
    pub async fn schedule_bundle(&self, request: &BundleJobRequest) -> AppResult<JobId> {
        let job = JobBuilder::build_for_bundle(request);
        self.submit(&job).await
    }

    /// Resolve an App Store id to its bundle id and schedule a run job.
    ///
    /// The lookup must return exactly one app; no match and several matches
    /// are both errors.
    pub async fn schedule_app_id(
        &self,
        lookup: &dyn StoreLookup,
        app_id: u64,
        options: &JobOptions,
    ) -> AppResult<JobId> {
        let records = lookup
            .lookup(&LookupQuery::AppId(app_id), options.country.as_deref())
            .await
            .map_err(|e| {
                error!("Lookup of app id {} failed: {}", app_id, e);
                e
            })?;

        let record = single_record(app_id, records).map_err(|e| {
            error!("No unique app with id {} found: {}", app_id, e);
            e
        })?;

        info!("App id {} resolved to {}", app_id, record.bundle_id);
        let request = BundleJobRequest::new(record.bundle_id, JobKind::Run).with_options(options);
        self.schedule_bundle(&request).await
    }

    /// Schedule a run job for every app listed by the feed at `url`.
    ///
    /// Failing to fetch or read the feed is an error. Individual submission
    /// failures are not: the remaining entries are still scheduled and the
    /// report is marked as failed.
    pub async fn schedule_feed(
        &self,
        feed: &dyn FeedSource,
        url: &str,
        options: &JobOptions,
    ) -> AppResult<RunReport> {
        let entries = feed.fetch_feed(url).await.map_err(|e| {
            error!("Fetching feed {} failed: {}", url, e);
            e
        })?;

        let mut report = RunReport::new(0, true);
        for entry in entries {
            report.scheduled += 1;
            let request =
                BundleJobRequest::new(entry.bundle_id, JobKind::Run).with_options(options);
            if self.schedule_bundle(&request).await.is_err() {
                report.success = false;
            }
        }

        info!(
            "{} feed jobs scheduled ({})",
            report.scheduled,
            if report.success { "all submitted" } else { "with failures" }
        );
        Ok(report)
    }

    async fn submit(&self, job: &JobDescriptor) -> AppResult<JobId> {
        let bundle_id = job.bundle_id().unwrap_or("<no bundle id>");

        match self.queue.submit_job(job).await {
            Ok(job_id) => {
                info!(
                    "Scheduled {} job {} for {}",
                    job.job_type().unwrap_or("?"),
                    job_id,
                    bundle_id
                );
                Ok(job_id)
            }
            Err(e) => {
                error!("Submitting job for {} failed: {}", bundle_id, e);
                Err(AppError::submission(format!("{}: {}", bundle_id, e)))
            }
        }
    }
}

fn single_record(app_id: u64, records: Vec<StoreRecord>) -> AppResult<StoreRecord> {
    let count = records.len();
    let mut records = records.into_iter();

    match (records.next(), count) {
        (Some(record), 1) => Ok(record),
        (None, _) => {
            warn!("App id {} not found in store", app_id);
            Err(AppError::not_found("app", app_id.to_string()))
        }
        (Some(_), count) => Err(AppError::ambiguous(app_id.to_string(), count)),
    }
}
