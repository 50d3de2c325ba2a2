use crate::error::{PrSemverError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "prsemver.toml";

/// Represents the complete configuration for pr-semver.
///
/// Contains the hosting service connection, versioning defaults and the
/// pull request title keyword table.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub keywords: KeywordsConfig,
}

fn default_tag_page_size() -> u32 {
    20
}

fn default_pull_request_page_size() -> u32 {
    30
}

fn default_child_page_size() -> u32 {
    20
}

/// Connection settings for the hosting service's REST API.
///
/// Credentials are usually supplied through the environment rather than the file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_tag_page_size")]
    pub tag_page_size: u32,

    /// Page size for pull requests merged into the root branch
    #[serde(default = "default_pull_request_page_size")]
    pub pull_request_page_size: u32,

    /// Page size for pull requests merged into feature branches
    #[serde(default = "default_child_page_size")]
    pub child_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            url: None,
            username: None,
            password: None,
            tag_page_size: default_tag_page_size(),
            pull_request_page_size: default_pull_request_page_size(),
            child_page_size: default_child_page_size(),
        }
    }
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_depth() -> u32 {
    1
}

/// Defaults for the version resolution itself.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersioningConfig {
    /// Root branch scanned for merged pull requests
    #[serde(default = "default_branch")]
    pub branch: String,

    /// How many levels of pull requests merged into source branches to walk
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Keep the major at zero during initial development
    #[serde(default)]
    pub dev: bool,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        VersioningConfig {
            branch: default_branch(),
            depth: default_depth(),
            dev: false,
        }
    }
}

/// Returns the default keywords that trigger major version bumps.
fn default_major_keywords() -> Vec<String> {
    vec!["major".to_string(), "breaking".to_string()]
}

/// Returns the default keywords that trigger minor version bumps.
fn default_minor_keywords() -> Vec<String> {
    vec!["minor".to_string(), "feature".to_string()]
}

/// Returns the default keywords that trigger patch version bumps.
fn default_patch_keywords() -> Vec<String> {
    vec!["patch".to_string(), "fix".to_string()]
}

/// Returns the default keywords accepted without any version change.
fn default_ignored_keywords() -> Vec<String> {
    vec!["doc".to_string(), "upkeep".to_string()]
}

/// Leading pull request title keywords and the increment each one implies.
///
/// Every merged pull request must start with one of these keywords, matched
/// case-insensitively.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct KeywordsConfig {
    #[serde(default = "default_major_keywords")]
    pub major: Vec<String>,

    #[serde(default = "default_minor_keywords")]
    pub minor: Vec<String>,

    #[serde(default = "default_patch_keywords")]
    pub patch: Vec<String>,

    #[serde(default = "default_ignored_keywords")]
    pub ignored: Vec<String>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        KeywordsConfig {
            major: default_major_keywords(),
            minor: default_minor_keywords(),
            patch: default_patch_keywords(),
            ignored: default_ignored_keywords(),
        }
    }
}

impl Config {
    /// Reject values that would make paging impossible
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("service.tag_page_size", self.service.tag_page_size),
            (
                "service.pull_request_page_size",
                self.service.pull_request_page_size,
            ),
            ("service.child_page_size", self.service.child_page_size),
        ];
        for (name, size) in sizes {
            if size == 0 {
                return Err(PrSemverError::config(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        if self.versioning.branch.trim().is_empty() {
            return Err(PrSemverError::config("versioning.branch must not be empty"));
        }
        Ok(())
    }
}

/// Expand a short branch name into a full ref (`main` -> `refs/heads/main`).
pub fn normalize_branch(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("refs/heads/{}", branch)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `prsemver.toml` in current directory
/// 3. `prsemver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded and validated configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local_path = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local_path.exists() {
        fs::read_to_string(local_path)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
