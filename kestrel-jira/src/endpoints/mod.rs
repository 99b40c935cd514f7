//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by Jira resource type.

pub mod issues;
