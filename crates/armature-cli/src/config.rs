//! Configuration file loading for the CLI.
//!
//! This module handles finding and loading TOML configuration files from
//! various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use crate::error::CliError;

/// CLI configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory of pre-rendered diagram images, keyed by guid.
    pub image_dir: Option<PathBuf>,
    /// Export images for package diagrams.
    pub export_package_diagrams: bool,
    /// Export images for class diagrams.
    pub export_class_diagrams: bool,
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (armature/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("armature/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "armature", "armature") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }
        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(CliConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<CliConfig, CliError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CliError::MissingConfig(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| CliError::ConfigParse(err.to_string()))
}
