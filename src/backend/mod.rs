//! Backend job queue
//!
//! Jobs are created with `POST {backend}/jobs` carrying the descriptor as a
//! JSON body. The backend persists the job and answers with its id, either as
//! `{"id": ...}`, `{"_id": ...}` or a bare JSON string.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::{BackendConfig, HttpConfig};
use crate::errors::{AppError, AppResult};
use crate::job::JobDescriptor;
use crate::models::JobId;
use crate::utils::{http_client, join_url};

/// Queue that accepts job descriptors
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn submit_job(&self, job: &JobDescriptor) -> AppResult<JobId>;
}

/// HTTP client for the backend's job endpoint
pub struct BackendClient {
    client: Client,
    jobs_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, backend: &BackendConfig, http: &HttpConfig) -> AppResult<Self> {
        let client = http_client::build_client(&http.user_agent, backend.timeout())?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            jobs_url: join_url(base_url, "jobs"),
        }
    }

    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }
}

/// Extract the job id from a creation response body
fn extract_job_id(body: &Value) -> Option<JobId> {
    let id = match body {
        Value::Object(map) => map.get("id").or_else(|| map.get("_id"))?,
        other => other,
    };

    match id {
        Value::String(s) if !s.is_empty() => Some(JobId(s.clone())),
        Value::Number(n) => Some(JobId(n.to_string())),
        _ => None,
    }
}

#[async_trait]
impl JobQueue for BackendClient {
    async fn submit_job(&self, job: &JobDescriptor) -> AppResult<JobId> {
        debug!(
            "Submitting {} job for {}",
            job.job_type().unwrap_or("?"),
            job.bundle_id().unwrap_or("?")
        );

        let request = self.client.post(&self.jobs_url).json(job);
        let response = http_client::send(request, &self.jobs_url).await?;
        let body: Value = http_client::read_json(response, &self.jobs_url, "backend").await?;

        extract_job_id(&body).ok_or_else(|| {
            AppError::parse("backend", format!("no job id in response: {}", body))
        })
    }
}
