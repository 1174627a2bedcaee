use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Longest response body kept in an HTTP status error
const MAX_ERROR_BODY: usize = 512;

/// Create a client with a total request timeout and our user agent
pub fn build_client(user_agent: &str, timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {e}")))
}

/// Send a request and turn connection failures and non-success statuses
/// into transport errors
pub async fn send(request: RequestBuilder, url: &str) -> AppResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::http_status(url, status.as_u16(), truncate(&body)));
    }

    debug!("{} answered {}", url, status);
    Ok(response)
}

/// Read a response body and decode it as JSON; undecodable bodies are
/// parse errors
pub async fn read_json<T: DeserializeOwned>(
    response: Response,
    url: &str,
    source_type: &str,
) -> AppResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| AppError::from_reqwest(url, e))?;

    serde_json::from_str(&body)
        .map_err(|e| AppError::parse(source_type, format!("{url}: {e}")))
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
