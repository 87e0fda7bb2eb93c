use std::{collections::HashMap, env, fs, io::Write, path::{Path, PathBuf}};
use log::*;
use anyhow::{Context, Result};
use chrono::Local;

/// Resolve a setting: the command line argument wins, then the environment variable (which can be set via .env),
/// then the default.
/// A setting taken from the command line or the environment is added to changed_options, so it can be written to .env.
pub fn set_option(
    option: &Option<String>,
    variable: &'static str,
    default: &str,
    changed_options: &mut HashMap<&'static str, String>,
) -> String
{
    // is the option set on the command line?
    if let Some(value) = option {
        info!("{} argument set: using: {}", variable, value);
        changed_options.insert(variable, value.to_string());
        return value.to_string();
    }
    // is the environment variable set (via dotenv().ok())?
    match env::var(variable) {
        Ok(set_var) => {
            info!("{} not set: set via .env: {}", variable, set_var);
            changed_options.insert(variable, set_var.to_owned());
            set_var
        }
        Err(_e) => {
            info!("{} not set: and not set via .env: using default: {}", variable, default);
            default.to_string()
        }
    }
}

pub fn set_seconds(
    option: &Option<String>,
    default: &str,
    changed_options: &mut HashMap<&'static str, String>,
) -> Result<u64>
{
    let seconds_string = set_option(option, "DEBUGINFO_SECONDS", default, changed_options);
    seconds_string.trim().parse()
        .with_context(|| format!("Invalid number of seconds: {}", seconds_string))
}

/// Without a directory set, a new directory `debuginfo.<timestamp>` in the temporary directory is used.
pub fn set_directory(
    option: &Option<String>,
    changed_options: &mut HashMap<&'static str, String>,
) -> PathBuf
{
    let default_directory = env::temp_dir().join(format!("debuginfo.{}", Local::now().format("%Y%m%d%H%M%S")));
    PathBuf::from(set_option(option, "DEBUGINFO_DIRECTORY", &default_directory.to_string_lossy(), changed_options))
}

/// Split a comma separated list of names. Without a list, all known names are used.
pub fn set_names(
    option: &Option<String>,
    known_names: &[&str],
) -> Vec<String>
{
    match option {
        Some(list) => list
            .split(',')
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(|r| r.to_string())
            .collect(),
        None => known_names.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn dotenv_writer(
    write_dotenv: bool,
    changed_options: HashMap<&str, String>,
) -> Result<()>
{
    if !changed_options.is_empty() && write_dotenv {
        info!("Writing .env file");
        write_dotenv_file(Path::new(".env"), changed_options)?;
    }
    Ok(())
}

fn write_dotenv_file(
    dotenv_file: &Path,
    changed_options: HashMap<&str, String>,
) -> Result<()>
{
    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(dotenv_file)
        .with_context(|| format!("Error writing .env file: {}", dotenv_file.display()))?;

    let mut keys: Vec<_> = changed_options.keys().collect();
    keys.sort();
    for key in keys {
        file.write_all(format!("{}={}\n", key, changed_options[key]).as_bytes())?;
        info!("{}={}", key, changed_options[key]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_set_option_argument_wins() {
        let mut changed_options = HashMap::new();
        env::set_var("DEBUGINFO_TEST_ARGUMENT", "from-env:1");
        let value = set_option(&Some(String::from("from-arg:1")), "DEBUGINFO_TEST_ARGUMENT", "default:1", &mut changed_options);
        assert_eq!(value, "from-arg:1");
        assert_eq!(changed_options["DEBUGINFO_TEST_ARGUMENT"], "from-arg:1");
    }
    #[test]
    fn unit_set_option_environment() {
        let mut changed_options = HashMap::new();
        env::set_var("DEBUGINFO_TEST_ENVIRONMENT", "from-env:1");
        let value = set_option(&None, "DEBUGINFO_TEST_ENVIRONMENT", "default:1", &mut changed_options);
        assert_eq!(value, "from-env:1");
        assert_eq!(changed_options["DEBUGINFO_TEST_ENVIRONMENT"], "from-env:1");
    }
    #[test]
    fn unit_set_option_default_is_not_remembered() {
        let mut changed_options = HashMap::new();
        let value = set_option(&None, "DEBUGINFO_TEST_NEVER_SET", "default:1", &mut changed_options);
        assert_eq!(value, "default:1");
        assert!(changed_options.is_empty());
    }
    #[test]
    fn unit_set_seconds() {
        let mut changed_options = HashMap::new();
        assert_eq!(set_seconds(&Some(String::from("30")), "15", &mut changed_options).unwrap(), 30);
        assert!(set_seconds(&Some(String::from("-1")), "15", &mut changed_options).is_err());
        assert!(set_seconds(&Some(String::from("ten")), "15", &mut changed_options).is_err());
    }
    #[test]
    fn unit_set_names_list() {
        let names = set_names(&Some(String::from("heap, goroutine,,trace")), &["mutex"]);
        assert_eq!(names, vec!["heap", "goroutine", "trace"]);
    }
    #[test]
    fn unit_set_names_default() {
        let names = set_names(&None, &["jemalloc", "state", "health"]);
        assert_eq!(names, vec!["jemalloc", "state", "health"]);
    }
    #[test]
    fn unit_write_dotenv_file() {
        let directory = tempfile::tempdir().unwrap();
        let dotenv_file = directory.path().join(".env");
        let mut changed_options = HashMap::new();
        changed_options.insert("DEBUGINFO_ZERO", String::from("zero1:6080"));
        changed_options.insert("DEBUGINFO_ALPHA", String::from("alpha1:8080"));

        write_dotenv_file(&dotenv_file, changed_options).unwrap();

        assert_eq!(fs::read_to_string(&dotenv_file).unwrap(), "DEBUGINFO_ALPHA=alpha1:8080\nDEBUGINFO_ZERO=zero1:6080\n");
    }
}
