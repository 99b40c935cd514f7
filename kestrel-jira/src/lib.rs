//! # Jira API Client
//!
//! Jira REST API integration for looking up issues, basic or with their full
//! comment thread, and mapping them into the [`Issue`] / [`FullIssue`] models
//! handed to agents.

pub mod auth;
mod client;
mod consts;
mod endpoints;
pub mod error;
pub mod issue;
pub mod models;

pub use auth::{create_jira_client_from_env, resolve_jira_auth};
// Re-export the client
pub use client::{ClientOptions, JiraAuth, JiraClient};
pub use error::JiraError;
// Re-export models
pub use issue::{Comment, FullIssue, Issue, IssueDetails};
