//! The impls and functions
//!
use std::{fmt, path::PathBuf, time::{Duration, Instant}};
use log::*;
use anyhow::{anyhow, Context, Result};
use colored::*;
use reqwest::Url;
use crate::utility;
use crate::collector::{CollectReport, EndpointKind, EndpointOutcome, METRIC_TYPES, PROFILE_TYPES};

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::Profile => f.pad("profile"),
            EndpointKind::Metric => f.pad("metric"),
        }
    }
}

impl EndpointKind {
    pub fn known_names(&self) -> &'static [&'static str] {
        match self {
            EndpointKind::Profile => &PROFILE_TYPES,
            EndpointKind::Metric => &METRIC_TYPES,
        }
    }
    pub fn is_known(&self, name: &str) -> bool {
        self.known_names().contains(&name)
    }
    /// Unknown names are not an error: the node decides what it serves.
    pub fn warn_unknown<S: AsRef<str>>(
        &self,
        names: &[S],
    )
    {
        for name in names.iter().map(|r| r.as_ref()).filter(|r| !self.is_known(r)) {
            warn!("{} type {} is not one of {:?}, requesting it anyway", self, name, self.known_names());
        }
    }
    /// The duration is only sent to profile endpoints, as whole seconds.
    pub fn request_url(
        &self,
        base_url: &str,
        name: &str,
        duration: Duration,
    ) -> String
    {
        match self {
            EndpointKind::Profile => format!("{}/debug/pprof/{}?duration={}", base_url, name, duration.as_secs()),
            EndpointKind::Metric => format!("{}/{}", base_url, name),
        }
    }
}

impl CollectReport {
    pub fn new(
        kind: EndpointKind,
        address: &str,
    ) -> Self
    {
        CollectReport {
            kind,
            address: address.to_string(),
            base_url: None,
            address_error: None,
            outcomes: Vec::new(),
        }
    }
    pub fn saved(&self) -> impl Iterator<Item = &EndpointOutcome> {
        self.outcomes.iter().filter(|r| r.result.is_ok())
    }
    pub fn failed(&self) -> impl Iterator<Item = &EndpointOutcome> {
        self.outcomes.iter().filter(|r| r.result.is_err())
    }
    /// True when the address resolved and every endpoint was saved.
    pub fn is_complete(&self) -> bool {
        self.address_error.is_none() && self.failed().count() == 0
    }
    pub fn print(&self) {
        if let Some(error) = &self.address_error {
            println!("{:10} {} {}: {:#}", "skipped".red(), self.kind, self.address, error);
            return;
        }
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(bytes) => println!("{:10} {:8} {:12} {} ({} bytes)", "saved".green(), self.kind, outcome.name, outcome.destination.display(), bytes),
                Err(error) => println!("{:10} {:8} {:12} {}: {:#}", "failed".red(), self.kind, outcome.name, outcome.source, error),
            }
        }
    }
}

fn has_host(url: &Url) -> bool {
    url.host_str().map_or(false, |host| !host.is_empty())
}

/// The url parser takes the first path segment as host for `http:///debug` or `http:////tmp/alpha`,
/// so the text itself must have something other than a `/` right after `://`.
fn has_authority(text: &str) -> bool {
    text.split_once("://")
        .map_or(false, |(_, rest)| !rest.is_empty() && !rest.starts_with('/'))
}

/// Turn an address into a URL with a host.
///
/// The address is parsed as-is first. If that fails, or the URL has no host while the scheme is not `file`,
/// it is parsed again with `http://` in front of it. This makes `localhost:8080` (which parses as scheme `localhost`)
/// and `127.0.0.1:8080` work, while fully qualified URLs are left alone.
/// An address that carries its own `://` is not retried.
pub fn resolve_address(address: &str) -> Result<Url> {
    let url = match Url::parse(address) {
        Ok(url) if url.scheme() == "file" || (has_host(&url) && has_authority(address)) => url,
        Ok(_) if address.contains("://") => return Err(anyhow!("error while parsing address {}: no host", address)),
        Err(e) if address.contains("://") => return Err(anyhow!(e).context(format!("error while parsing address {}", address))),
        _ => {
            let retry = format!("http://{}", address);
            if !has_authority(&retry) {
                return Err(anyhow!("error while parsing address {}: no host", address));
            }
            Url::parse(&retry)
                .with_context(|| format!("error while parsing address {}", address))?
        }
    };
    if !has_host(&url) {
        return Err(anyhow!("error while parsing address {}: no host", address));
    }
    Ok(url)
}

/// The serialized URL without the trailing `/` the serialization adds for an empty path.
pub fn base_url(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

pub fn output_path(
    path_prefix: &str,
    name: &str,
) -> PathBuf
{
    PathBuf::from(format!("{}{}.gz", path_prefix, name))
}

/// Fetch `<base>/debug/pprof/<name>?duration=<seconds>` for every profile name and save each as `<path_prefix><name>.gz`.
pub fn collect_profiles<S: AsRef<str>>(
    address: &str,
    path_prefix: &str,
    duration: Duration,
    profiles: &[S],
) -> CollectReport
{
    collect(EndpointKind::Profile, address, path_prefix, duration, profiles)
}

/// Fetch `<base>/<name>` for every metric name and save each as `<path_prefix><name>.gz`.
/// The duration only extends the request timeout.
pub fn collect_metrics<S: AsRef<str>>(
    address: &str,
    path_prefix: &str,
    duration: Duration,
    metrics: &[S],
) -> CollectReport
{
    collect(EndpointKind::Metric, address, path_prefix, duration, metrics)
}

fn collect<S: AsRef<str>>(
    kind: EndpointKind,
    address: &str,
    path_prefix: &str,
    duration: Duration,
    names: &[S],
) -> CollectReport
{
    info!("begin collect {}s from {}", kind, address);
    let timer = Instant::now();

    let mut report = CollectReport::new(kind, address);

    let base = match resolve_address(address) {
        Ok(url) => base_url(&url),
        Err(e) => {
            error!("{:#}", e);
            report.address_error = Some(e);
            return report;
        }
    };
    debug!("{} resolved to {}", address, base);

    for name in names.iter().map(|r| r.as_ref()) {
        let source = kind.request_url(&base, name, duration);
        let destination = output_path(path_prefix, name);

        let result = utility::save_debug(&source, &destination, duration);
        match &result {
            Ok(_) => info!("saving {} {} in {}", name, kind, destination.display()),
            Err(e) => error!("error while saving {} from {}: {:#}", kind, source, e),
        }

        report.outcomes.push(EndpointOutcome {
            name: name.to_string(),
            source,
            destination,
            result,
        });
    }
    report.base_url = Some(base);

    info!("end collect {}s from {}: {:?}", kind, address, timer.elapsed());

    report
}
