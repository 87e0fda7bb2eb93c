//! Utilities
//!
//! - `http`: fetch an url with a timeout and save the response body to a file.
//! - `options`: resolve settings from the command line, the environment (.env) or defaults, and write them back to .env.
//!
mod http;
mod options;

pub use http::*;
pub use options::*;
