//! # Kestrel MCP Server
//!
//! Model Context Protocol server exposing Jira issue lookup to AI agents.
//!
//! The server offers a single tool, `fetch_jira_issue`, which returns either
//! the basic details of an issue or the full issue including its description
//! and comment thread.

pub mod context;
pub mod server;
pub mod tools;
pub mod types;

pub use context::ServerContext;
pub use server::KestrelMcpServer;
