use tracing::{debug, error, info, warn};

use super::JobScheduler;
use crate::errors::AppResult;
use crate::job::{BundleJobRequest, JobOptions};
use crate::models::{
    AppCatalogEntry, JobKind, LookupOutcome, RunReport, StoreRecord, MAX_CATALOG_BATCH,
};
use crate::sources::{CatalogIndex, StoreLookup};
use crate::utils::datetime::DateTimeParser;

/// Strictly later release date; an identical timestamp is not a new release
pub fn is_newer_release(entry: &AppCatalogEntry, live: &StoreRecord) -> bool {
    live.release_date > entry.release_date
}

impl JobScheduler {
    /// Schedule a dioscope job for every catalog entry whose store release is
    /// newer than the indexed one.
    ///
    /// Entries are processed in catalog order, at most [`MAX_CATALOG_BATCH`]
    /// of them. A failed lookup aborts the run; jobs submitted before the
    /// failure stay submitted. Apps missing from the store are skipped, and a
    /// rejected submission only marks the run as failed.
    pub async fn schedule_new_versions(
        &self,
        catalog: &[AppCatalogEntry],
        lookup: &dyn StoreLookup,
        country: &str,
        options: &JobOptions,
    ) -> RunReport {
        if catalog.len() > MAX_CATALOG_BATCH {
            warn!(
                "Catalog holds {} apps, only the first {} are checked",
                catalog.len(),
                MAX_CATALOG_BATCH
            );
        }

        let mut scheduled = 0;
        let mut success = true;

        for entry in catalog.iter().take(MAX_CATALOG_BATCH) {
            let live = match lookup.lookup_bundle(&entry.bundle_id, Some(country)).await {
                Ok(LookupOutcome::Found(record)) => record,
                Ok(LookupOutcome::NotFound) => {
                    info!("{} not found in App Store ({}), skipping", entry.bundle_id, country);
                    continue;
                }
                Err(e) => {
                    let cause = if e.is_transport() { "store unreachable" } else { "unreadable answer" };
                    error!(
                        "Lookup of {} failed ({}), aborting after {} scheduled jobs: {}",
                        entry.bundle_id, cause, scheduled, e
                    );
                    return RunReport::failed(scheduled);
                }
            };

            if !is_newer_release(entry, &live) {
                continue;
            }

            scheduled += 1;
            debug!(
                "{} ({} -> {}, released {})",
                entry.bundle_id,
                entry.version,
                live.version,
                DateTimeParser::format_for_log(&live.release_date)
            );

            let request = BundleJobRequest::new(entry.bundle_id.clone(), JobKind::Dioscope)
                .with_options(options)
                .with_country(country);
            if self.schedule_bundle(&request).await.is_err() {
                success = false;
            }
        }

        info!("{} jobs scheduled", scheduled);
        RunReport::new(scheduled, success)
    }

    /// Load up to `limit` apps from the index and run
    /// [`JobScheduler::schedule_new_versions`] over them. Failing to read the
    /// index is an error.
    pub async fn schedule_index_updates(
        &self,
        index: &dyn CatalogIndex,
        limit: usize,
        lookup: &dyn StoreLookup,
        country: &str,
        options: &JobOptions,
    ) -> AppResult<RunReport> {
        let catalog = index
            .fetch_catalog(limit.min(MAX_CATALOG_BATCH))
            .await
            .map_err(|e| {
                error!("Reading the app index failed: {}", e);
                e
            })?;

        Ok(self
            .schedule_new_versions(&catalog, lookup, country, options)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;
    use tracing_test::traced_test;

    use crate::backend::JobQueue;
    use crate::job::JobDescriptor;
    use crate::models::JobId;
    use crate::sources::LookupQuery;

    struct EmptyStore;

    #[async_trait]
    impl StoreLookup for EmptyStore {
        async fn lookup(&self, _query: &LookupQuery, _country: Option<&str>) -> AppResult<Vec<StoreRecord>> {
            Ok(Vec::new())
        }
    }

    struct AcceptingQueue;

    #[async_trait]
    impl JobQueue for AcceptingQueue {
        async fn submit_job(&self, _job: &JobDescriptor) -> AppResult<JobId> {
            Ok(JobId("1".to_string()))
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_app_is_logged_below_warning() {
        let scheduler = JobScheduler::new(Arc::new(AcceptingQueue));
        let catalog = [AppCatalogEntry {
            bundle_id: "com.gone".to_string(),
            version: "1.0".to_string(),
            release_date: Utc.with_ymd_and_hms(2015, 3, 10, 0, 0, 0).unwrap(),
        }];

        let report = scheduler
            .schedule_new_versions(&catalog, &EmptyStore, "de", &JobOptions::default())
            .await;

        assert_eq!(report, RunReport::new(0, true));
        logs_assert(|lines: &[&str]| {
            let line = lines
                .iter()
                .find(|line| line.contains("com.gone not found in App Store"))
                .ok_or_else(|| "no not-found line logged".to_string())?;
            if line.contains("WARN") || line.contains("ERROR") {
                return Err(format!("not-found logged too loudly: {}", line));
            }
            Ok(())
        });
    }

    #[test]
    fn test_is_newer_release_is_strict() {
        let released = Utc.with_ymd_and_hms(2015, 3, 10, 20, 21, 13).unwrap();
        let entry = AppCatalogEntry {
            bundle_id: "com.x.y".to_string(),
            version: "2.0".to_string(),
            release_date: released,
        };
        let mut live = StoreRecord {
            bundle_id: "com.x.y".to_string(),
            track_id: None,
            version: "2.0".to_string(),
            release_date: released,
        };

        assert!(!is_newer_release(&entry, &live));

        live.release_date = released + Duration::seconds(1);
        assert!(is_newer_release(&entry, &live));

        live.release_date = released - Duration::days(1);
        assert!(!is_newer_release(&entry, &live));
    }

    #[test]
    fn test_version_strings_are_not_compared() {
        let released = Utc.with_ymd_and_hms(2015, 3, 10, 0, 0, 0).unwrap();
        let entry = AppCatalogEntry {
            bundle_id: "com.x.y".to_string(),
            version: "10.0".to_string(),
            release_date: released,
        };
        let live = StoreRecord {
            bundle_id: "com.x.y".to_string(),
            track_id: None,
            version: "9.0".to_string(),
            release_date: released + Duration::hours(1),
        };

        assert!(is_newer_release(&entry, &live));
    }
}
