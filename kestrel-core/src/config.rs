//! # Configuration Management
//!
//! Handles the kestrel configuration directories and the optional
//! `jira.toml` file, including XDG base directory support.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::issue_key::IssueKeyMode;

/// Represents the configuration directories for the kestrel application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("dev", "", "kestrel").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the path to the Jira configuration file
  pub fn jira_config_path(&self) -> PathBuf {
    self.config_dir.join("jira.toml")
  }

  /// Load Jira configuration from file or return default
  pub fn load_jira_config(&self) -> Result<JiraConfig> {
    let config_path = self.jira_config_path();

    if config_path.exists() {
      load_jira_config_from(&config_path)
    } else {
      debug!(path = %config_path.display(), "No Jira config file, using defaults");
      Ok(JiraConfig::default())
    }
  }
}

/// Load Jira configuration from an explicit path. The file must exist.
pub fn load_jira_config_from(path: &Path) -> Result<JiraConfig> {
  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read Jira config from {}", path.display()))?;

  let config: JiraConfig =
    toml::from_str(&content).with_context(|| format!("Failed to parse Jira config from {}", path.display()))?;

  debug!(path = %path.display(), "Loaded Jira config");
  Ok(config)
}

/// Settings read from `jira.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JiraConfig {
  /// Jira host URL, used when neither `JIRA_URL` nor `JIRA_HOST` is set
  pub host: Option<String>,

  /// How strictly issue identifiers are validated
  pub parsing: IssueKeyMode,

  /// Number of comments requested per page when fetching full issues
  pub comment_page_size: u32,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Custom field ids mapped into issue results
  pub fields: CustomFieldIds,
}

impl Default for JiraConfig {
  fn default() -> Self {
    Self {
      host: None,
      parsing: IssueKeyMode::Flexible,
      comment_page_size: 100,
      timeout_secs: 30,
      fields: CustomFieldIds::default(),
    }
  }
}

impl JiraConfig {
  pub const fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Jira custom field ids. Instances differ, so every id can be overridden or
/// disabled by setting it to an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CustomFieldIds {
  pub errata_link: Option<String>,
  pub fixed_in_build: Option<String>,
  pub preliminary_testing: Option<String>,
  pub test_coverage: Option<String>,
}

impl Default for CustomFieldIds {
  fn default() -> Self {
    Self {
      errata_link: Some("customfield_12322244".to_string()),
      fixed_in_build: Some("customfield_12318450".to_string()),
      preliminary_testing: Some("customfield_12321540".to_string()),
      test_coverage: Some("customfield_12320940".to_string()),
    }
  }
}

impl CustomFieldIds {
  /// All configured, non-empty field ids.
  pub fn enabled(&self) -> impl Iterator<Item = &str> {
    [
      &self.errata_link,
      &self.fixed_in_build,
      &self.preliminary_testing,
      &self.test_coverage,
    ]
    .into_iter()
    .filter_map(|id| id.as_deref())
    .filter(|id| !id.is_empty())
  }
}
