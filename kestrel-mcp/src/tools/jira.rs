//! Parameter structs for Jira tools.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchJiraIssueParams {
  /// ID of the JIRA issue
  pub issue_id: String,
  /// Indicates whether to retrieve the full issue, including the comments section. If false, only the basic issue details are returned
  pub full: bool,
}
