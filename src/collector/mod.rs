//! Module for collecting the `/debug/pprof/*` profiles and the metrics endpoints of a node.
//!
//! A node exposes runtime profiles under `/debug/pprof/<name>` (goroutine, heap, threadcreate, block, mutex, profile, trace),
//! and a few plain endpoints directly under the root (`/jemalloc`, `/state`, `/health`).
//!
//! debuginfo doesn't do anything other than:
//! - normalize the address into a base URL (`host:port` becomes `http://host:port`).
//! - perform a HTTP GET for every requested name, one after another.
//! - save the response body as-is as "*prefix**name*.gz".
//!
//! A failing endpoint is logged and recorded in the [`CollectReport`], and collection continues with the next one.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
