//! debuginfo: collect the profiles and metrics of the alpha and zero nodes into a directory.
//!
use clap::Parser;
use std::{collections::HashMap, fs, path::Path, time::{Duration, Instant}};
use log::*;
use anyhow::{Context, Result};
use debuginfo::{collector, utility, CollectReport, EndpointKind, METRIC_TYPES, PROFILE_TYPES};

const DEFAULT_ALPHA: &str = "localhost:8080";
const DEFAULT_ZERO: &str = "localhost:6080";
const DEFAULT_SECONDS: &str = "15";

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Opts {
    /// address of the alpha node (host:port or url), an empty string skips the alpha
    #[arg(short, long)]
    alpha: Option<String>,
    /// address of the zero node (host:port or url), an empty string skips the zero
    #[arg(short, long)]
    zero: Option<String>,
    /// directory to write the files to, default a new directory in the temporary directory
    #[arg(short, long)]
    directory: Option<String>,
    /// duration in seconds for the profile and trace collection
    #[arg(short, long)]
    seconds: Option<String>,
    /// comma separated list of profiles, default all
    #[arg(short, long)]
    profiles: Option<String>,
    /// comma separated list of metrics, default all
    #[arg(short, long)]
    metrics: Option<String>,
    /// write the used settings to .env for the next run
    #[arg(long)]
    write_dotenv: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenv::dotenv().ok();
    let options = Opts::parse();

    let mut changed_options = HashMap::new();
    let alpha = utility::set_option(&options.alpha, "DEBUGINFO_ALPHA", DEFAULT_ALPHA, &mut changed_options);
    let zero = utility::set_option(&options.zero, "DEBUGINFO_ZERO", DEFAULT_ZERO, &mut changed_options);
    let directory = utility::set_directory(&options.directory, &mut changed_options);
    let duration = Duration::from_secs(utility::set_seconds(&options.seconds, DEFAULT_SECONDS, &mut changed_options)?);

    let profiles = utility::set_names(&options.profiles, &PROFILE_TYPES);
    let metrics = utility::set_names(&options.metrics, &METRIC_TYPES);
    EndpointKind::Profile.warn_unknown(&profiles);
    EndpointKind::Metric.warn_unknown(&metrics);

    fs::create_dir_all(&directory)
        .with_context(|| format!("Cannot create directory: {}", directory.display()))?;

    info!("begin debuginfo");
    let timer = Instant::now();

    let mut reports: Vec<CollectReport> = Vec::new();
    for (node, address) in [("alpha", &alpha), ("zero", &zero)] {
        if address.is_empty() {
            info!("{} address not set, skipping", node);
            continue;
        }
        reports.extend(collect_node(node, address, &directory, duration, &profiles, &metrics));
    }

    info!("end debuginfo: {:?}", timer.elapsed());

    for report in &reports {
        report.print();
    }
    println!("debug information written to: {}", directory.display());

    utility::dotenv_writer(options.write_dotenv, changed_options)?;

    Ok(())
}

/// All files of a node share the prefix `<directory>/<node>_`.
fn collect_node(
    node: &str,
    address: &str,
    directory: &Path,
    duration: Duration,
    profiles: &[String],
    metrics: &[String],
) -> [CollectReport; 2]
{
    let path_prefix = directory.join(format!("{}_", node)).to_string_lossy().to_string();
    [
        collector::collect_profiles(address, &path_prefix, duration, profiles),
        collector::collect_metrics(address, &path_prefix, duration, metrics),
    ]
}
