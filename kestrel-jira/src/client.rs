use std::time::Duration;

use anyhow::{Context, Result};
use kestrel_core::{CustomFieldIds, JiraConfig};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::consts::{API_PATH, USER_AGENT};
use crate::error::JiraError;

/// Represents Jira authentication credentials
#[derive(Clone)]
pub enum JiraAuth {
  /// Username and API token (Jira Cloud) or password, sent as HTTP basic auth
  Basic { username: String, api_token: String },
  /// Personal access token (Jira Server / Data Center), sent as a bearer token
  Bearer { token: String },
}

impl JiraAuth {
  pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
    match self {
      Self::Basic { username, api_token } => request.basic_auth(username, Some(api_token)),
      Self::Bearer { token } => request.bearer_auth(token),
    }
  }
}

impl std::fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Basic { username, .. } => f
        .debug_struct("Basic")
        .field("username", username)
        .field("api_token", &"<redacted>")
        .finish(),
      Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
    }
  }
}

/// Tunables for a [`JiraClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
  pub timeout: Duration,
  pub comment_page_size: u32,
  pub fields: CustomFieldIds,
}

impl Default for ClientOptions {
  fn default() -> Self {
    Self::from(&JiraConfig::default())
  }
}

impl From<&JiraConfig> for ClientOptions {
  fn from(config: &JiraConfig) -> Self {
    Self {
      timeout: config.timeout(),
      comment_page_size: config.comment_page_size.max(1),
      fields: config.fields.clone(),
    }
  }
}

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: Url,
  pub(crate) auth: JiraAuth,
  pub(crate) options: ClientOptions,
}

impl std::fmt::Debug for JiraClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JiraClient")
      .field("base_url", &self.base_url.as_str())
      .field("auth", &self.auth)
      .finish_non_exhaustive()
  }
}

impl JiraClient {
  /// Create a new Jira client with default options
  pub fn new(base_url: &str, auth: JiraAuth) -> Result<Self> {
    Self::with_options(base_url, auth, ClientOptions::default())
  }

  /// Create a new Jira client
  pub fn with_options(base_url: &str, auth: JiraAuth, options: ClientOptions) -> Result<Self> {
    let mut base_url = Url::parse(base_url).with_context(|| format!("Invalid Jira base URL '{base_url}'"))?;
    if base_url.cannot_be_a_base() {
      anyhow::bail!("Invalid Jira base URL '{base_url}': expected an http(s) URL");
    }
    base_url.set_query(None);
    base_url.set_fragment(None);

    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(options.timeout)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self {
      client,
      base_url,
      auth,
      options,
    })
  }

  /// Base URL without a trailing slash, as used in browse links
  pub fn base_url(&self) -> &str {
    self.base_url.as_str().trim_end_matches('/')
  }

  pub const fn options(&self) -> &ClientOptions {
    &self.options
  }

  /// Build a REST API URL. Each segment is percent-encoded, so issue keys can
  /// never escape their path position.
  pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(API_PATH).extend(segments);
    }
    url
  }

  /// Send an authenticated GET and decode a JSON body.
  ///
  /// `key` names the issue in `NotFound` and `Decode` errors.
  pub(crate) async fn get_json<T: DeserializeOwned>(
    &self,
    url: Url,
    query: &[(&str, String)],
    key: &str,
  ) -> Result<T, JiraError> {
    debug!(url = %url, "GET");
    let response = self.auth.apply(self.client.get(url)).query(query).send().await?;
    let body = check_status(response, key).await?.bytes().await?;

    serde_json::from_slice(&body).map_err(|source| JiraError::Decode {
      key: key.to_string(),
      source,
    })
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let response = self
      .auth
      .apply(self.client.get(self.endpoint(&["myself"])))
      .send()
      .await
      .context("Failed to connect to Jira")?;

    Ok(response.status().is_success())
  }
}

async fn check_status(response: Response, key: &str) -> Result<Response, JiraError> {
  match response.status() {
    status if status.is_success() => Ok(response),
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JiraError::Unauthorized),
    StatusCode::NOT_FOUND => Err(JiraError::NotFound { key: key.to_string() }),
    status => Err(JiraError::Http {
      status,
      body: response.text().await.unwrap_or_default(),
    }),
  }
}
