//! Core constants shared across kestrel components.

/// Environment variable holding the full Jira base URL.
pub const ENV_JIRA_URL: &str = "JIRA_URL";

/// Environment variable for the Jira host, accepted when `JIRA_URL` is unset.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Environment variable holding a Jira personal access token.
pub const ENV_JIRA_TOKEN: &str = "JIRA_TOKEN";

/// Machine name tried in `.netrc` when the Jira host has no entry of its own.
pub const FALLBACK_NETRC_MACHINE: &str = "atlassian.net";
