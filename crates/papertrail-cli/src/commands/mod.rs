//! Subcommands and the helpers they share.

pub mod batch;
pub mod budget;
pub mod config;
pub mod output;
pub mod parse;
pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use papertrail_core::PapertrailConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("papertrail")
        .join("config.json")
}

/// Configuration file in effect: the `--config` flag or the default location.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicitly requested file must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PapertrailConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(PapertrailConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(PapertrailConfig::from_file(&path)?)
    } else {
        Ok(PapertrailConfig::default())
    }
}

/// Read a transcript from a file, or from stdin when the path is `-`.
pub fn read_transcript(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(std::fs::read_to_string(input)?)
}
