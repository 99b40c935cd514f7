//! Shared server context available to all tool handlers.

use std::path::PathBuf;

use kestrel_core::{IssueKeyParser, JiraConfig};
use kestrel_jira::JiraClient;
use tokio::sync::OnceCell;
use tracing::error;

use crate::types::ToolError;

/// Shared context available to all tool handlers.
pub struct ServerContext {
  pub home_dir: PathBuf,
  pub config: JiraConfig,
  parser: IssueKeyParser,

  /// Lazily initialized on first Jira call. Failures are not cached, so
  /// fixing credentials does not require a server restart.
  jira_client: OnceCell<JiraClient>,
}

impl ServerContext {
  pub fn new(home_dir: PathBuf, config: JiraConfig) -> Self {
    Self {
      parser: IssueKeyParser::new(config.parsing),
      home_dir,
      config,
      jira_client: OnceCell::new(),
    }
  }

  /// Context with a ready-made Jira client.
  pub fn with_jira_client(home_dir: PathBuf, config: JiraConfig, client: JiraClient) -> Self {
    Self {
      jira_client: OnceCell::new_with(Some(client)),
      ..Self::new(home_dir, config)
    }
  }

  /// Validate and normalize an issue identifier.
  pub fn parse_issue_id(&self, issue_id: &str) -> Result<String, ToolError> {
    self.parser.parse(issue_id).map_err(|e| ToolError {
      code: "invalid_params".into(),
      message: e.to_string(),
      hint: Some("Pass an issue key such as PROJ-123 or a numeric issue id.".into()),
    })
  }

  /// Lazily initialise and return the Jira client.
  pub async fn get_jira_client(&self) -> Result<&JiraClient, ToolError> {
    self
      .jira_client
      .get_or_try_init(|| async { kestrel_jira::create_jira_client_from_env(&self.home_dir, &self.config) })
      .await
      .map_err(|e| {
        let reason = format!("{e:#}");
        error!(error = %reason, "Jira client unavailable");
        ToolError {
          code: "credentials_missing".into(),
          message: format!("Jira client unavailable: {reason}"),
          hint: Some("Set $JIRA_URL and $JIRA_TOKEN, or add credentials for the Jira host to `~/.netrc`.".into()),
        }
      })
  }
}
