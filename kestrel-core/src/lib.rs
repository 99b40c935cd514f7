//! # Kestrel Core Library
//!
//! Shared building blocks for the kestrel crates: configuration loading,
//! credential discovery, Jira URL resolution and issue key parsing.

pub mod config;
pub mod consts;
pub mod creds;
pub mod issue_key;
pub mod url;

pub use config::{ConfigDirs, CustomFieldIds, JiraConfig, load_jira_config_from};
pub use creds::Credentials;
pub use issue_key::{IssueKeyError, IssueKeyMode, IssueKeyParser};
