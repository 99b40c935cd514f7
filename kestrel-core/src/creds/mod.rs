//! # Credential Management
//!
//! Retrieval of authentication credentials for the Jira instance. Credentials
//! come either from a personal access token in the environment or from the
//! user's `.netrc` file.

pub mod netrc;

use std::path::Path;

use anyhow::Result;

use crate::consts::{ENV_JIRA_TOKEN, FALLBACK_NETRC_MACHINE};

/// Represents credentials for a service
#[derive(Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// Read the personal access token from `$JIRA_TOKEN`, ignoring blank values.
pub fn jira_token_from_env() -> Option<String> {
  std::env::var(ENV_JIRA_TOKEN)
    .ok()
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty())
}

/// Look up `.netrc` credentials for a Jira host.
///
/// The normalized host is tried first, then the shared `atlassian.net`
/// machine. A missing `.netrc` file is treated as "no credentials".
pub fn find_jira_netrc_credentials(home: &Path, jira_host: &str) -> Result<Option<Credentials>> {
  let netrc_path = netrc::get_netrc_path(home);
  if !netrc_path.exists() {
    return Ok(None);
  }

  let normalized_host = netrc::normalize_host(jira_host);
  for machine in [normalized_host.as_str(), FALLBACK_NETRC_MACHINE] {
    if let Some(creds) = netrc::parse_netrc_file(&netrc_path, machine)? {
      tracing::debug!(machine, "Found Jira credentials in .netrc");
      return Ok(Some(creds));
    }
  }

  Ok(None)
}
