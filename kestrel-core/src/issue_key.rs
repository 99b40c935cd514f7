//! # Issue Key Parser
//!
//! Validates and normalizes the issue identifiers agents pass in. Agents are
//! loose about formatting (`rhel123`, ` RHEL-123 `), so flexible mode accepts
//! those and produces the canonical `PROJECT-NUMBER` form. Numeric issue ids
//! are passed through untouched since Jira accepts them in place of keys.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parsing mode for issue identifiers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueKeyMode {
  /// Only accepts canonical keys such as `RHEL-1234`
  Strict,
  /// Accepts `RHEL-1234`, `rhel-1234`, `rhel1234`, etc.
  #[default]
  Flexible,
}

/// Errors that can occur while parsing an issue identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssueKeyError {
  #[error("Issue identifier cannot be empty")]
  Empty,
  #[error("Invalid issue identifier: '{0}' is neither an issue key (e.g. PROJ-123) nor a numeric id")]
  InvalidFormat(String),
}

static NUMERIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("Failed to compile numeric id regex"));

static STRICT_KEY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]+-\d+$").expect("Failed to compile strict issue key regex"));

static FLEXIBLE_KEYS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
  [
    Regex::new(r"^([A-Za-z][A-Za-z0-9_]+)-(\d+)$").expect("Failed to compile issue key regex with hyphen"),
    // Without a hyphen, digits can only belong to the issue number.
    Regex::new(r"^([A-Za-z][A-Za-z_]+)(\d+)$").expect("Failed to compile issue key regex without hyphen"),
  ]
});

/// Issue identifier parser with configurable strictness
#[derive(Debug, Clone, Default)]
pub struct IssueKeyParser {
  mode: IssueKeyMode,
}

impl IssueKeyParser {
  pub const fn new(mode: IssueKeyMode) -> Self {
    Self { mode }
  }

  /// Parse an issue identifier, returning its canonical form
  pub fn parse(&self, input: &str) -> Result<String, IssueKeyError> {
    let input = input.trim();
    if input.is_empty() {
      return Err(IssueKeyError::Empty);
    }

    if NUMERIC_ID.is_match(input) {
      return Ok(input.to_string());
    }

    match self.mode {
      IssueKeyMode::Strict if STRICT_KEY.is_match(input) => Ok(input.to_string()),
      IssueKeyMode::Strict => Err(IssueKeyError::InvalidFormat(input.to_string())),
      IssueKeyMode::Flexible => FLEXIBLE_KEYS
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .map(|caps| format!("{}-{}", caps[1].to_uppercase(), &caps[2]))
        .ok_or_else(|| IssueKeyError::InvalidFormat(input.to_string())),
    }
  }
}
