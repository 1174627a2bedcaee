//! Utility functions for the scheduler
//!
//! - Base URL sanitisation for the backend and index hosts
//! - Release-date parsing (`utils::datetime`)
//! - Shared reqwest plumbing (`utils::http_client`)

pub mod datetime;
pub mod http_client;

/// Sanitize a base URL by removing trailing slashes and ensuring a scheme
///
/// `localhost:9200/` becomes `http://localhost:9200`, which lets callers
/// append paths with a single `/`.
pub fn sanitize_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().to_string();

    while url.ends_with('/') {
        url.pop();
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("http://{}", url);
    }

    url
}

/// Join a sanitized base URL with a relative path
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        sanitize_base_url(base_url),
        path.trim_start_matches('/')
    )
}
