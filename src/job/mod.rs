//! Job descriptor construction
//!
//! A job descriptor is the JSON document handed to the backend queue. It is
//! produced by deep-merging caller overrides into the default template of a
//! job kind:
//!
//! ```rust
//! use dioscope_scheduler::job::{BundleJobRequest, JobBuilder};
//! use dioscope_scheduler::models::JobKind;
//!
//! let job = JobBuilder::build_for_bundle(
//!     &BundleJobRequest::new("com.example.app", JobKind::Dioscope).with_country("de"),
//! );
//! assert_eq!(job.job_type(), Some("dioscope"));
//! assert_eq!(job.state(), Some("pending"));
//! assert_eq!(job.bundle_id(), Some("com.example.app"));
//! ```

pub mod builder;
pub mod descriptor;
pub mod merge;
pub mod templates;

pub use builder::{BundleJobRequest, JobBuilder, JobOptions};
pub use descriptor::JobDescriptor;
pub use merge::deep_merge;
pub use templates::JobTemplate;
