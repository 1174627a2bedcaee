use serde_json::{Map, Value};

use super::{deep_merge, JobDescriptor, JobTemplate};
use crate::models::JobKind;

/// Options shared by every scheduling path
///
/// Presence decides inclusion: a supplied empty string or `"0"` is forwarded
/// to the backend as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOptions {
    pub account_id: Option<String>,
    pub country: Option<String>,
    pub execution_strategy: Option<String>,
}

/// Everything needed to build a job for one bundle id
#[derive(Debug, Clone, PartialEq)]
pub struct BundleJobRequest {
    pub bundle_id: String,
    pub worker: Option<Value>,
    pub device: Option<Value>,
    pub account_id: Option<String>,
    pub country: Option<String>,
    pub execution_strategy: Option<String>,
    pub kind: JobKind,
}

impl BundleJobRequest {
    pub fn new<S: Into<String>>(bundle_id: S, kind: JobKind) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            worker: None,
            device: None,
            account_id: None,
            country: None,
            execution_strategy: None,
            kind,
        }
    }

    pub fn with_worker(mut self, worker: Value) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn with_device(mut self, device: Value) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_account<S: Into<String>>(mut self, account_id: S) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_execution_strategy<S: Into<String>>(mut self, strategy: S) -> Self {
        self.execution_strategy = Some(strategy.into());
        self
    }

    /// Copy account, country and strategy from shared options
    pub fn with_options(mut self, options: &JobOptions) -> Self {
        self.account_id = options.account_id.clone();
        self.country = options.country.clone();
        self.execution_strategy = options.execution_strategy.clone();
        self
    }

    /// Override document containing only what was supplied
    pub fn to_overrides(&self) -> Map<String, Value> {
        let mut job_info = Map::new();
        job_info.insert("bundleId".to_string(), Value::from(self.bundle_id.as_str()));
        if let Some(account_id) = &self.account_id {
            job_info.insert("accountId".to_string(), Value::from(account_id.as_str()));
        }
        if let Some(country) = &self.country {
            job_info.insert("storeCountry".to_string(), Value::from(country.as_str()));
        }
        if let Some(strategy) = &self.execution_strategy {
            job_info.insert(
                "executionStrategy".to_string(),
                Value::from(strategy.as_str()),
            );
        }

        let mut overrides = Map::new();
        overrides.insert("jobInfo".to_string(), Value::Object(job_info));
        if let Some(worker) = &self.worker {
            overrides.insert("worker".to_string(), worker.clone());
        }
        if let Some(device) = &self.device {
            overrides.insert("device".to_string(), device.clone());
        }
        overrides
    }
}

/// Builds job descriptors from the per-kind templates
pub struct JobBuilder;

impl JobBuilder {
    /// Deep-merge `overrides` into a fresh copy of the template for `kind`
    pub fn build(kind: JobKind, overrides: &Map<String, Value>) -> JobDescriptor {
        let mut document = JobTemplate::for_kind(kind).to_document();
        deep_merge(&mut document, overrides);
        JobDescriptor::from_document(document)
    }

    /// Same as [`JobBuilder::build`] but resolves the kind from its name;
    /// unknown names build a run job.
    pub fn build_named(kind: &str, overrides: &Map<String, Value>) -> JobDescriptor {
        Self::build(JobKind::from_name(kind), overrides)
    }

    pub fn build_for_bundle(request: &BundleJobRequest) -> JobDescriptor {
        Self::build(request.kind, &request.to_overrides())
    }
}
