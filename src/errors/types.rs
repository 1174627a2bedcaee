//! Error type definitions for the scheduler
//!
//! The variants split along the lines the scheduling runs care about:
//! transport failures abort a run, submission failures only mark it as
//! partially failed, and parse failures are always fatal.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The request never produced a response (DNS, connect, timeout, body read)
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// An upstream service answered with a non-success status
    #[error("HTTP error: {status} from {url} - {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// A response body did not have the expected shape
    #[error("Parse error: {source_type} - {message}")]
    Parse { source_type: String, message: String },

    /// A single-identifier lookup returned no result
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// A single-identifier lookup returned more than one result
    #[error("Ambiguous match: {count} results for id {id}")]
    AmbiguousMatch { id: String, count: usize },

    /// The backend did not accept a job
    #[error("Job submission failed: {message}")]
    Submission { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a transport error for a request to `url`
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status<U: Into<String>, B: Into<String>>(url: U, status: u16, body: B) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a parse error for a response of the given source type
    pub fn parse<S: Into<String>, M: Into<String>>(source_type: S, message: M) -> Self {
        Self::Parse {
            source_type: source_type.into(),
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an ambiguous match error
    pub fn ambiguous<I: Into<String>>(id: I, count: usize) -> Self {
        Self::AmbiguousMatch {
            id: id.into(),
            count,
        }
    }

    /// Create a submission error
    pub fn submission<S: Into<String>>(message: S) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error came from the network layer rather than from the
    /// content of a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Map a reqwest failure onto a transport error, keeping the request url
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        Self::transport(url, err.to_string())
    }
}
