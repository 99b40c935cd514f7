//! # Command Line Interface
//!
//! `serve` runs the MCP server on stdio; `fetch` runs the same tool once and
//! prints its JSON result; `check` verifies Jira credentials.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use directories::BaseDirs;
use kestrel_core::url::resolve_jira_base_url;
use kestrel_core::{ConfigDirs, JiraConfig, load_jira_config_from};
use kestrel_jira::create_jira_client_from_env;
use kestrel_mcp::tools::jira::FetchJiraIssueParams;
use kestrel_mcp::{KestrelMcpServer, ServerContext};
use rmcp::ServiceExt;
use tracing::{info, warn};

/// Top-level CLI command
#[derive(Parser)]
#[command(name = "kestrel")]
#[command(version, about = "Fetch Jira issues for AI agents over the Model Context Protocol")]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Read Jira settings from this file instead of the default jira.toml
  #[arg(long = "config", value_name = "PATH", global = true)]
  pub config: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Run the MCP server on stdin/stdout
  Serve,

  /// Fetch a single issue and print the tool result as JSON
  #[command(long_about = "Fetches a Jira issue exactly as the fetch_jira_issue tool does and prints\n\
                      the JSON result. Exits with status 1 when the tool reports an error.")]
  Fetch {
    /// Issue key (PROJ-123) or numeric id
    #[arg(value_name = "ISSUE_ID")]
    issue_id: String,

    /// Include the description and all comments
    #[arg(long, short = 'f')]
    full: bool,
  },

  /// Check that Jira credentials are configured and accepted
  Check,
}

pub async fn handle_cli(cli: Cli) -> Result<ExitCode> {
  let config = load_config(cli.config.as_deref())?;
  let home_dir = BaseDirs::new()
    .context("Failed to determine home directory")?
    .home_dir()
    .to_path_buf();

  match cli.command {
    Commands::Serve => serve(home_dir, config).await,
    Commands::Fetch { issue_id, full } => fetch(home_dir, config, issue_id, full).await,
    Commands::Check => check(home_dir, config).await,
  }
}

fn load_config(path: Option<&std::path::Path>) -> Result<JiraConfig> {
  match path {
    Some(path) => load_jira_config_from(path),
    None => ConfigDirs::new()
      .context("Failed to initialise config directories")?
      .load_jira_config(),
  }
}

async fn serve(home_dir: PathBuf, config: JiraConfig) -> Result<ExitCode> {
  let server = KestrelMcpServer::new(ServerContext::new(home_dir, config));

  info!("Starting MCP server on stdio");
  let service = server.serve(rmcp::transport::io::stdio()).await?;
  service.waiting().await?;

  Ok(ExitCode::SUCCESS)
}

async fn fetch(home_dir: PathBuf, config: JiraConfig, issue_id: String, full: bool) -> Result<ExitCode> {
  let server = KestrelMcpServer::new(ServerContext::new(home_dir, config));
  let response = server
    .run_fetch_jira_issue(FetchJiraIssueParams { issue_id, full })
    .await;

  let mut stdout = io::stdout().lock();
  writeln!(stdout, "{}", response.to_text()).context("Failed to write to stdout")?;

  Ok(if response.is_error() {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  })
}

async fn check(home_dir: PathBuf, config: JiraConfig) -> Result<ExitCode> {
  let base_url = resolve_jira_base_url(config.host.as_deref())?;
  let client = create_jira_client_from_env(&home_dir, &config)?;

  let mut stdout = io::stdout().lock();
  if client.test_connection().await? {
    writeln!(stdout, "Jira credentials for {base_url} are valid.")?;
    Ok(ExitCode::SUCCESS)
  } else {
    warn!(base_url = %base_url, "Jira rejected the configured credentials");
    writeln!(stdout, "Jira at {base_url} rejected the configured credentials.")?;
    Ok(ExitCode::FAILURE)
  }
}
