//! Structured response and error types for kestrel-mcp tools.
//!
//! Every tool returns a JSON-serialized `ToolResponse<T>`: either an `ok`
//! payload or a structured error with a machine-readable code.

use kestrel_jira::{IssueDetails, JiraError};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Standard envelope for all tool responses.
#[derive(Debug, Serialize)]
#[serde(tag = "status")]
pub enum ToolResponse<T: Serialize> {
  #[serde(rename = "ok")]
  Ok { data: T },
  #[serde(rename = "error")]
  Error { error: ToolError },
}

impl<T: Serialize> ToolResponse<T> {
  pub const fn ok(data: T) -> Self {
    Self::Ok { data }
  }

  pub const fn is_error(&self) -> bool {
    matches!(self, Self::Error { .. })
  }

  /// Pretty-printed JSON (two-space indent), the text agents receive.
  pub fn to_text(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_else(|e| {
      format!(r#"{{"status":"error","error":{{"code":"internal","message":"Serialization failed: {e}"}}}}"#)
    })
  }

  /// Serialize to a `CallToolResult`, setting `is_error` for error responses.
  pub fn to_call_tool_result(&self) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(self.to_text())]);
    result.is_error = Some(self.is_error());
    result
  }
}

impl<T: Serialize> From<ToolError> for ToolResponse<T> {
  fn from(error: ToolError) -> Self {
    Self::Error { error }
  }
}

/// Consistent error shape returned by all tools.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolError {
  pub code: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
}

impl From<&JiraError> for ToolError {
  fn from(error: &JiraError) -> Self {
    let (code, hint) = match error {
      JiraError::Unauthorized => (
        "auth_failed",
        Some("Check $JIRA_TOKEN or the .netrc entry for the Jira host."),
      ),
      JiraError::NotFound { .. } => (
        "not_found",
        Some("Check the issue key; the issue may also be hidden from this account."),
      ),
      JiraError::Http { .. } | JiraError::Request(_) => ("network_error", None),
      JiraError::Decode { .. } => ("parse_error", None),
    };

    Self {
      code: code.into(),
      message: format!("Error fetching or parsing JIRA issue: {}", error_chain(error)),
      hint: hint.map(Into::into),
    }
  }
}

/// Render an error with its sources, `outer: inner: root`.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
  let mut rendered = error.to_string();
  let mut source = error.source();
  while let Some(cause) = source {
    rendered.push_str(": ");
    rendered.push_str(&cause.to_string());
    source = cause.source();
  }
  rendered
}

// ---------------------------------------------------------------------------
// Jira responses
// ---------------------------------------------------------------------------

/// Response for `fetch_jira_issue`.
#[derive(Debug, Serialize)]
pub struct FetchJiraIssueOutput {
  pub results: IssueDetails,
}
