//! Parameter structs for the tools exposed by the server.

pub mod jira;
