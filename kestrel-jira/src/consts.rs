//! Constants for the kestrel-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("kestrel/", env!("CARGO_PKG_VERSION"));

/// Path prefix of the Jira REST API version this client speaks
pub const API_PATH: [&str; 3] = ["rest", "api", "2"];
