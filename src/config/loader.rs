use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::AppseedConfig;
use crate::appseed_error::AppseedError;
use crate::observability::{set_current_file, set_phase, RunPhase};

/// Name of the configuration file searched for in the working directory and
/// its ancestors.
pub const CONFIG_FILE_NAME: &str = ".appseed.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<AppseedConfig, AppseedError> {
    let config = toml::from_str::<AppseedConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file the user named explicitly. Unlike discovery, a
/// missing or broken file is an error.
pub fn load_config_file(path: &Path) -> Result<AppseedConfig, AppseedError> {
    let _file = set_current_file(path);
    let contents = read_config_file(path)
        .map_err(|e| AppseedError::from_io_error(e, Some(path.to_path_buf())))?;
    let config = toml::from_str::<AppseedConfig>(&contents)
        .map_err(|e| AppseedError::config_parse(e.to_string(), path))?;
    config.validate()?;
    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<AppseedConfig> {
    let _file = set_current_file(config_path);
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}. Using defaults.", config_path.display(), e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its ancestors, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.appseed.toml` at or above `start`.
pub fn load_config_from(start: &Path) -> AppseedConfig {
    let _phase = set_phase(RunPhase::ConfigLoading);
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            AppseedConfig::default()
        })
}

pub fn load_config() -> AppseedConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            AppseedConfig::default()
        }
    }
}
