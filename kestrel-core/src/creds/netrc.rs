//! Helpers for reading credentials stored in `.netrc` files.
//!
//! Only reading is supported; kestrel never writes credentials.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;
use url::Url;

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use kestrel_core::creds::netrc::get_netrc_path;
///
/// let home = Path::new("/home/user");
/// let path = get_netrc_path(home);
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Parses a `.netrc` file and returns credentials for the requested machine.
///
/// The file is read as a stream of whitespace separated tokens, so single-line
/// (`machine host login user password pass`) and multi-line entries are both
/// supported. If the target machine is not present or has missing
/// `login`/`password` values, `Ok(None)` is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  warn_if_readable_by_others(path);
  Ok(parse_netrc(&content, target_machine))
}

/// Token-level parser behind [`parse_netrc_file`].
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut in_target = false;
  let mut login = None;
  let mut password = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if in_target {
          break;
        }
        in_target = tokens.next() == Some(target_machine);
      }
      "default" if in_target => break,
      "login" => {
        let value = tokens.next();
        if in_target {
          login = value;
        }
      }
      "password" => {
        let value = tokens.next();
        if in_target {
          password = value;
        }
      }
      _ => {}
    }
  }

  match (login, password) {
    (Some(username), Some(password)) => Some(Credentials {
      username: username.to_string(),
      password: password.to_string(),
    }),
    _ => None,
  }
}

#[cfg(unix)]
fn warn_if_readable_by_others(path: &Path) {
  use std::os::unix::fs::PermissionsExt;

  if let Ok(metadata) = fs::metadata(path)
    && metadata.permissions().mode() & 0o077 != 0
  {
    warn!(path = %path.display(), "Credentials file is accessible by other users; consider `chmod 600`");
  }
}

#[cfg(not(unix))]
fn warn_if_readable_by_others(_path: &Path) {}

/// Reduces a Jira host URL to the machine name used in `.netrc`.
///
/// Scheme, port, userinfo and any context path are dropped. Input that does
/// not parse as a URL only has its protocol prefix and trailing slashes
/// stripped.
///
/// # Examples
///
/// ```
/// use kestrel_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
/// assert_eq!(normalize_host("https://example.com/jira"), "example.com");
/// assert_eq!(normalize_host("jira.example.com:8443"), "jira.example.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  let trimmed = raw_host.trim();
  let candidate = if trimmed.contains("://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let parsed = Url::parse(&candidate).ok();
  match parsed.as_ref().and_then(Url::host_str) {
    Some(host) if !host.is_empty() => host.to_string(),
    _ => trimmed
      .trim_start_matches("https://")
      .trim_start_matches("http://")
      .trim_end_matches('/')
      .to_string(),
  }
}
