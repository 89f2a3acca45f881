use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GrellyError, Result};

/// File name looked up in the repository directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "grelly.toml";

/// Represents the complete configuration for grelly.
///
/// Contains the version patterns, resolution policy and release settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub patterns: PatternsConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_branch_pattern() -> String {
    "release/<major>[.<minor>]".to_string()
}

fn default_tag_pattern() -> String {
    "[v]<major>.<minor>[.<patch>]".to_string()
}

fn default_release_commit_pattern() -> String {
    "release: <major>.<minor>.<patch>".to_string()
}

fn default_changelog() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

/// Templates used to recognise version information.
///
/// See [crate::domain::pattern] for the template syntax.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PatternsConfig {
    #[serde(default = "default_branch_pattern")]
    pub branch: String,

    #[serde(default = "default_tag_pattern")]
    pub tag: String,

    #[serde(default = "default_release_commit_pattern")]
    pub release_commit: String,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        PatternsConfig {
            branch: default_branch_pattern(),
            tag: default_tag_pattern(),
            release_commit: default_release_commit_pattern(),
        }
    }
}

/// How the base commit for PATCH is chosen when the branch name supplied the version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BasePolicy {
    /// Nearest marker whose major.minor is at or below the resolved one
    #[default]
    NearestAtOrBelow,
    /// Nearest marker regardless of its version
    Nearest,
    /// No base; PATCH counts every commit
    Root,
}

/// Settings that shape version resolution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub base_policy: BasePolicy,

    /// Append a pre-release suffix on feature/fix/other branches
    #[serde(default)]
    pub branch_suffix: bool,

    /// Add the base marker's own patch number to the commit distance
    #[serde(default)]
    pub add_marker_patch: bool,
}

/// Settings for `--release`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    #[serde(default = "default_changelog")]
    pub changelog: PathBuf,

    /// Also create a release commit and tag that commit
    #[serde(default)]
    pub commit: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            changelog: default_changelog(),
            commit: false,
        }
    }
}

/// Values given on the command line, applied on top of the loaded file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub branch_pattern: Option<String>,
    pub tag_pattern: Option<String>,
    pub release_pattern: Option<String>,
    pub changelog: Option<PathBuf>,
    pub base_policy: Option<BasePolicy>,
    pub branch_suffix: bool,
    pub commit: bool,
}

impl Config {
    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(p) = overrides.branch_pattern {
            self.patterns.branch = p;
        }
        if let Some(p) = overrides.tag_pattern {
            self.patterns.tag = p;
        }
        if let Some(p) = overrides.release_pattern {
            self.patterns.release_commit = p;
        }
        if let Some(path) = overrides.changelog {
            self.release.changelog = path;
        }
        if let Some(policy) = overrides.base_policy {
            self.resolution.base_policy = policy;
        }
        if overrides.branch_suffix {
            self.resolution.branch_suffix = true;
        }
        if overrides.commit {
            self.release.commit = true;
        }
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| GrellyError::config(format!("Invalid configuration: {}", e)))
}

fn read_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|e| {
        GrellyError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&text)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `grelly.toml` in `search_dir` (the repository directory)
/// 3. `grelly/grelly.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err(GrellyError::Config)` - If a file exists but cannot be read or parsed,
///   or the custom path cannot be read
pub fn load_config(config_path: Option<&Path>, search_dir: &Path) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(path);
    }

    let local = search_dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return read_config(&local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("grelly").join(CONFIG_FILE_NAME);
        if user.is_file() {
            return read_config(&user);
        }
    }

    Ok(Config::default())
}
