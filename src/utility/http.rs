use std::{fs, io, path::Path, time::Duration};
use log::*;
use anyhow::{anyhow, Context, Result};
use reqwest::{blocking::Response, header::CONTENT_TYPE, StatusCode};

/// Header set by the profiling handlers of a node when the body contains a readable error message.
pub const PPROF_ERROR_HEADER: &str = "X-Go-Pprof";

/// Profiles like `profile` and `trace` are gathered on the server for the requested duration,
/// so the request must be allowed to take longer than that.
pub fn fetch_timeout(duration: Duration) -> Duration {
    duration + duration / 2 + Duration::from_secs(2)
}

/// Fetch `source` and write the response body unchanged into `destination`.
/// The destination is created, or truncated if it exists.
/// Returns the number of bytes written.
pub fn save_debug(
    source: &str,
    destination: &Path,
    duration: Duration,
) -> Result<u64>
{
    info!("fetching information over HTTP from {}", source);
    if !duration.is_zero() {
        info!("please wait... ({:?})", duration);
    }

    let mut response = fetch_url(source, fetch_timeout(duration))?;

    let mut file = fs::File::create(destination)
        .with_context(|| format!("error while creating dump file: {}", destination.display()))?;
    let bytes = io::copy(&mut response, &mut file)
        .with_context(|| format!("error while writing dump file: {}", destination.display()))?;

    debug!("{} bytes written to {}", bytes, destination.display());
    Ok(bytes)
}

pub fn fetch_url(
    source: &str,
    timeout: Duration,
) -> Result<Response>
{
    let response = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .with_context(|| "error while creating http client")?
        .get(source)
        .send()
        .with_context(|| format!("http fetch: {}", source))?;

    if response.status() != StatusCode::OK {
        debug!("Non success response: {} = {}", source, response.status());
        return Err(status_code_error(response));
    }

    debug!("Success response: {} = {}", source, response.status());
    Ok(response)
}

/// Only a plain text body marked by the profiling handlers is worth showing; anything else reports the status.
fn status_code_error(response: Response) -> anyhow::Error {
    let status = response.status();
    let marked = response.headers()
        .get(PPROF_ERROR_HEADER)
        .map_or(false, |r| !r.is_empty());
    let plain_text = response.headers()
        .get(CONTENT_TYPE)
        .and_then(|r| r.to_str().ok())
        .map_or(false, |r| r.contains("text/plain"));

    if marked && plain_text {
        if let Ok(body) = response.text() {
            return anyhow!("server response: {} - {}", status, body);
        }
    }
    anyhow!("server response: {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_fetch_timeout_ten_seconds() {
        assert_eq!(fetch_timeout(Duration::from_secs(10)), Duration::from_secs(17));
    }
    #[test]
    fn unit_fetch_timeout_zero() {
        assert_eq!(fetch_timeout(Duration::ZERO), Duration::from_secs(2));
    }
    #[test]
    fn unit_fetch_timeout_odd_seconds() {
        assert_eq!(fetch_timeout(Duration::from_secs(15)), Duration::from_millis(24_500));
    }
}
