//! MCP server implementation with all tool handlers.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use tracing::{error, info};

use crate::context::ServerContext;
use crate::tools::jira::FetchJiraIssueParams;
use crate::types::*;

#[derive(Clone)]
pub struct KestrelMcpServer {
  context: Arc<ServerContext>,
  tool_router: ToolRouter<Self>,
}

#[tool_router]
impl KestrelMcpServer {
  pub fn new(context: ServerContext) -> Self {
    let context = Arc::new(context);
    Self {
      context,
      tool_router: Self::tool_router(),
    }
  }

  // =========================================================================
  // Jira tools
  // =========================================================================

  #[tool(
    description = "Fetch a JIRA issue",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  pub async fn fetch_jira_issue(&self, params: Parameters<FetchJiraIssueParams>) -> Result<CallToolResult, McpError> {
    Ok(self.run_fetch_jira_issue(params.0).await.to_call_tool_result())
  }
}

impl KestrelMcpServer {
  /// Body of `fetch_jira_issue`, shared with the one-shot CLI.
  ///
  /// Every failure is logged and returned as an error response; nothing is
  /// swallowed into an empty result.
  pub async fn run_fetch_jira_issue(&self, params: FetchJiraIssueParams) -> ToolResponse<FetchJiraIssueOutput> {
    let issue_key = match self.context.parse_issue_id(&params.issue_id) {
      Ok(k) => k,
      Err(e) => {
        error!(issue_id = %params.issue_id, error = %e.message, "Rejected JIRA issue id");
        return e.into();
      }
    };

    let jira = match self.context.get_jira_client().await {
      Ok(c) => c,
      Err(e) => return e.into(),
    };

    info!(issue_key = %issue_key, full = params.full, "Fetching JIRA issue");
    match jira.get_issue(&issue_key, params.full).await {
      Ok(results) => ToolResponse::ok(FetchJiraIssueOutput { results }),
      Err(e) => {
        error!(issue_key = %issue_key, error = %error_chain(&e), "Error fetching or parsing JIRA issue");
        ToolError::from(&e).into()
      }
    }
  }
}

#[tool_handler]
impl ServerHandler for KestrelMcpServer {
  fn get_info(&self) -> ServerInfo {
    ServerInfo {
      instructions: Some(
        "Kestrel MCP server. Provides read-only access to JIRA issues: basic details, \
         or the full issue with its description and comments."
          .into(),
      ),
      capabilities: ServerCapabilities::builder().enable_tools().build(),
      ..Default::default()
    }
  }
}
