//! Wire models for the Jira REST API v2.
//!
//! These mirror the JSON Jira sends and are deliberately permissive: Jira
//! returns `null` for unset fields and omits anything not requested, so every
//! optional piece defaults instead of failing the whole issue.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Represents a Jira issue
#[derive(Debug, Deserialize)]
pub struct JiraIssue {
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueFields {
  #[serde(default, deserialize_with = "null_as_default")]
  pub summary: String,
  #[serde(default)]
  pub status: Option<JiraNamed>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub components: Vec<JiraNamed>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub fix_versions: Vec<JiraNamed>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub labels: Vec<String>,
  #[serde(default)]
  pub assignee: Option<JiraUser>,
  #[serde(default)]
  pub priority: Option<JiraNamed>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub comment: Option<JiraCommentPage>,
  /// Everything else, custom fields included
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Any Jira object identified by a `name` (status, component, version, priority)
#[derive(Debug, Clone, Deserialize)]
pub struct JiraNamed {
  pub name: String,
}

/// Represents a Jira user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(default)]
  pub display_name: String,
  #[serde(default)]
  pub email_address: Option<String>,
}

/// One page of issue comments, either embedded in the issue or from the
/// `issue/{key}/comment` endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraCommentPage {
  #[serde(default, deserialize_with = "null_as_default")]
  pub comments: Vec<JiraComment>,
  #[serde(default)]
  pub start_at: u64,
  #[serde(default)]
  pub max_results: u64,
  #[serde(default)]
  pub total: u64,
}

/// Represents a Jira comment
#[derive(Debug, Deserialize)]
pub struct JiraComment {
  pub id: String,
  #[serde(default)]
  pub author: Option<JiraUser>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub body: String,
  #[serde(deserialize_with = "jira_timestamp")]
  pub created: DateTime<FixedOffset>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Jira writes offsets without a colon (`2024-01-15T10:30:00.000+0000`),
/// which RFC 3339 parsing rejects.
fn jira_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f%z")
    .or_else(|_| DateTime::parse_from_rfc3339(&raw))
    .map_err(|e| serde::de::Error::custom(format!("invalid Jira timestamp '{raw}': {e}")))
}
