//! Centralized error handling for the scheduler
//!
//! Lookup, feed, index and backend failures all funnel into [`AppError`].
//! Expected outcomes such as "app not in the store" are not errors; they are
//! modelled by [`crate::models::LookupOutcome`] instead.
//!
//! # Error Categories
//!
//! - **Transport Errors**: connection failures and non-success HTTP statuses
//! - **Parse Errors**: response bodies that do not have the expected shape
//! - **Lookup Errors**: missing or ambiguous single-identifier lookups
//! - **Submission Errors**: the backend rejected a job
//!
//! # Usage
//!
//! ```rust
//! use dioscope_scheduler::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("backend url missing"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
