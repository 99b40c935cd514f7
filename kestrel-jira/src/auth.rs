//! Authentication helpers for the Jira client.
//!
//! These helpers centralize credential lookup so that the MCP server and the
//! one-shot CLI build their Jira client the same way.

use std::path::Path;

use anyhow::{Context, Result};
use kestrel_core::JiraConfig;
use kestrel_core::consts::{ENV_JIRA_TOKEN, FALLBACK_NETRC_MACHINE};
use kestrel_core::creds::netrc::normalize_host;
use kestrel_core::creds::{find_jira_netrc_credentials, jira_token_from_env};
use kestrel_core::url::resolve_jira_base_url;
use tracing::debug;

use crate::client::{ClientOptions, JiraAuth, JiraClient};

/// Resolve credentials for the Jira instance at `jira_host`.
///
/// A personal access token in `$JIRA_TOKEN` wins; otherwise `.netrc` is
/// consulted for the host and then for `atlassian.net`.
pub fn resolve_jira_auth(home: &Path, jira_host: &str) -> Result<JiraAuth> {
  if let Some(token) = jira_token_from_env() {
    debug!("Using Jira personal access token from {ENV_JIRA_TOKEN}");
    return Ok(JiraAuth::Bearer { token });
  }

  if let Some(creds) = find_jira_netrc_credentials(home, jira_host)? {
    return Ok(JiraAuth::Basic {
      username: creds.username,
      api_token: creds.password,
    });
  }

  let normalized_host = normalize_host(jira_host);
  Err(anyhow::anyhow!(
    "Jira credentials not found. Set {ENV_JIRA_TOKEN} or add a .netrc entry for machine '{normalized_host}' or '{FALLBACK_NETRC_MACHINE}'."
  ))
}

/// Creates an authenticated Jira client from the environment, `.netrc` and
/// `jira.toml` settings.
pub fn create_jira_client_from_env(home: &Path, config: &JiraConfig) -> Result<JiraClient> {
  let base_url = resolve_jira_base_url(config.host.as_deref())?;
  let auth = resolve_jira_auth(home, &base_url).context("Failed to get credentials")?;
  debug!(base_url = %base_url, "Creating Jira client");

  JiraClient::with_options(&base_url, auth, ClientOptions::from(config))
}
