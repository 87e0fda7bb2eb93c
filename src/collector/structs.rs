//! The structs
//!
use std::path::PathBuf;

/// The profile types served under `/debug/pprof/`.
pub const PROFILE_TYPES: [&str; 7] = [
    "goroutine",
    "heap",
    "threadcreate",
    "block",
    "mutex",
    "profile",
    "trace",
];

/// The metric types served directly under the root of the http endpoint.
pub const METRIC_TYPES: [&str; 3] = [
    "jemalloc",
    "state",
    "health",
];

/// The kind of endpoint, which determines the shape of the request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// `<base>/debug/pprof/<name>?duration=<seconds>`
    Profile,
    /// `<base>/<name>`
    Metric,
}

/// The result of fetching and saving a single endpoint.
#[derive(Debug)]
pub struct EndpointOutcome {
    pub name: String,
    pub source: String,
    pub destination: PathBuf,
    /// The number of bytes written to `destination`.
    pub result: anyhow::Result<u64>,
}

/// The outcome of a collect run against one address.
#[derive(Debug)]
pub struct CollectReport {
    pub kind: EndpointKind,
    pub address: String,
    pub base_url: Option<String>,
    /// Set when the address could not be turned into a URL with a host.
    /// In that case no endpoint is fetched and `outcomes` stays empty.
    pub address_error: Option<anyhow::Error>,
    pub outcomes: Vec<EndpointOutcome>,
}
