//! Errors returned by Jira API calls.

pub use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single Jira request.
#[derive(Debug, Error)]
pub enum JiraError {
  #[error("Authentication failed. Please check your Jira credentials.")]
  Unauthorized,

  #[error("Issue {key} not found")]
  NotFound { key: String },

  #[error("Unexpected error: HTTP {status} - {body}")]
  Http { status: StatusCode, body: String },

  #[error("Failed to reach Jira")]
  Request(#[from] reqwest::Error),

  #[error("Failed to parse Jira response for {key}")]
  Decode {
    key: String,
    #[source]
    source: serde_json::Error,
  },
}
