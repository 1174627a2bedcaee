//! Scheduler for dioscope app analysis jobs
//!
//! Bundle ids are sourced from the App Store lookup API, iTunes RSS feeds or
//! the index of previously analysed apps, turned into job descriptors and
//! submitted to the backend queue.

pub mod backend;
pub mod config;
pub mod errors;
pub mod job;
pub mod models;
pub mod scheduler;
pub mod sources;
pub mod utils;
