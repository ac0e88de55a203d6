use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GatherError, Result};

const LOCAL_CONFIG_FILE: &str = "gatherpackages.toml";
const USER_CONFIG_FILE: &str = ".gatherpackages.toml";

/// Represents the complete configuration for gather-packages.
///
/// Contains branch rules, filesystem layout, and registry settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub branches: BranchRules,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_main_branch() -> String {
    "master".to_string()
}

fn default_release_marker() -> String {
    "release/".to_string()
}

/// Branch naming rules used to pick a dist-tag.
///
/// Both fields are matched as substrings of the branch name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchRules {
    /// The only branch that receives the `nightly` tag
    #[serde(default = "default_main_branch")]
    pub main: String,

    #[serde(default = "default_release_marker")]
    pub release_marker: String,
}

impl Default for BranchRules {
    fn default() -> Self {
        BranchRules {
            main: default_main_branch(),
            release_marker: default_release_marker(),
        }
    }
}

fn default_package_dir() -> String {
    "common/temp/artifacts/packages".to_string()
}

fn default_staging_subdir() -> String {
    "imodeljs/packages".to_string()
}

/// Locations of local archives and the staging area, relative to the
/// sources directory and artifact staging directory respectively.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_package_dir")]
    pub package_dir: String,

    #[serde(default = "default_staging_subdir")]
    pub staging_subdir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            package_dir: default_package_dir(),
            staging_subdir: default_staging_subdir(),
        }
    }
}

fn default_registry_command() -> String {
    "npm".to_string()
}

fn default_scope_marker() -> String {
    "@".to_string()
}

/// Registry query settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Program invoked as `<command> view ...`
    #[serde(default = "default_registry_command")]
    pub command: String,

    /// Prepended to package names derived from archive file names
    #[serde(default = "default_scope_marker")]
    pub scope_marker: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            command: default_registry_command(),
            scope_marker: default_scope_marker(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gatherpackages.toml` in current directory
/// 3. `.gatherpackages.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        read_config_file(Path::new(LOCAL_CONFIG_FILE))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses a TOML configuration document.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| GatherError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| GatherError::config(format!("Cannot read '{}': {}", path.display(), e)))
}
