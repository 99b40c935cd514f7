//! URL helpers for locating the Jira instance.
//!
//! The base URL comes from the environment first and the config file second,
//! and is always normalized to carry an explicit scheme.

use anyhow::Result;
use tracing::debug;
use url::{Position, Url};

use crate::consts::{ENV_JIRA_HOST, ENV_JIRA_URL};

/// Resolve the Jira base URL with a proper URL scheme.
///
/// Lookup order is `$JIRA_URL`, then `$JIRA_HOST`, then the `host` value from
/// `jira.toml`. Blank values are skipped. If the host doesn't include a
/// scheme (http:// or https://), assumes https://.
pub fn resolve_jira_base_url(config_host: Option<&str>) -> Result<String> {
  for var in [ENV_JIRA_URL, ENV_JIRA_HOST] {
    if let Ok(value) = std::env::var(var)
      && !value.trim().is_empty()
    {
      debug!(source = var, "Using Jira host from environment");
      return ensure_url_scheme(&value);
    }
  }

  match config_host {
    Some(host) if !host.trim().is_empty() => {
      debug!("Using Jira host from config file");
      ensure_url_scheme(host)
    }
    _ => Err(anyhow::anyhow!(
      "Jira host not configured. Set '{ENV_JIRA_URL}' or '{ENV_JIRA_HOST}', or add `host` to jira.toml"
    )),
  }
}

/// Build the human-facing browse URL for an issue.
pub fn issue_browse_url(base_url: &str, issue_key: &str) -> String {
  format!("{}/browse/{}", base_url.trim_end_matches('/'), issue_key)
}

/// Render a parsed URL without the lone `/` path `Url` adds to bare hosts.
fn render_url(url: &Url) -> String {
  let mut rendered = url[..Position::BeforePath].to_string();
  if url.path() != "/" {
    rendered.push_str(url.path());
  }
  rendered.push_str(&url[Position::AfterPath..]);
  rendered
}

/// Parse `host[/path]` as an https URL, dropping a broken `http:`/`https:` prefix.
fn parse_as_https(input: &str) -> Result<Url> {
  let host_part = match input.split_once(':') {
    Some((scheme, rest))
      if (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        && !rest.trim_start_matches('/').is_empty() =>
    {
      rest.trim_start_matches('/')
    }
    _ => input,
  };

  Url::parse(&format!("https://{host_part}"))
    .map_err(|e| anyhow::anyhow!("Failed to parse URL '{input}': {e}. Ensure it has a valid scheme."))
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// If the input doesn't include a scheme, assumes https://. Malformed schemes
/// like "http:/example.com" (missing slash) are repaired to https.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  let broken_scheme = (lowered.starts_with("http:") && !lowered.starts_with("http://"))
    || (lowered.starts_with("https:") && !lowered.starts_with("https://"));
  if broken_scheme {
    return parse_as_https(trimmed).map(|url| render_url(&url));
  }

  let url = match Url::parse(trimmed) {
    Ok(url) if url.scheme().len() > 1 && url.host().is_some() => url,
    _ => parse_as_https(trimmed)?,
  };

  Ok(render_url(&url))
}
