//! debuginfo collects the profiling (`/debug/pprof/*`) and metrics endpoints of a node into local files,
//! so they can be sent along with a problem report.
//!
pub mod collector;
pub mod utility;

pub use collector::{collect_metrics, collect_profiles, CollectReport, EndpointKind, EndpointOutcome, METRIC_TYPES, PROFILE_TYPES};
