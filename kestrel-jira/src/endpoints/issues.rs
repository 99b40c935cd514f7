//! # Jira Issue Endpoints
//!
//! Fetching a single issue, optionally with its complete comment thread.

use tracing::{debug, instrument, warn};

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::issue::{FullIssue, Issue, IssueDetails};
use crate::models::{JiraComment, JiraCommentPage, JiraIssue};

const BASIC_FIELDS: [&str; 7] = ["summary", "status", "components", "fixVersions", "labels", "assignee", "priority"];
const FULL_FIELDS: [&str; 2] = ["description", "comment"];

impl JiraClient {
  /// Get a Jira issue by key or numeric id.
  ///
  /// With `full` set, the description and every comment are included; the
  /// comment thread is paged through until Jira's reported total is reached.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str, full: bool) -> Result<IssueDetails, JiraError> {
    let mut raw: JiraIssue = self
      .get_json(
        self.endpoint(&["issue", issue_key]),
        &[("fields", self.requested_fields(full))],
        issue_key,
      )
      .await?;

    let issue = Issue::from_jira(&raw, self.base_url(), &self.options.fields);
    if !full {
      return Ok(IssueDetails::Basic(issue));
    }

    let comments = match raw.fields.comment.take() {
      Some(page) if page.total > page.start_at + page.comments.len() as u64 => {
        let next = page.start_at + page.comments.len() as u64;
        let mut comments = page.comments;
        comments.extend(self.get_comments(&raw.key, next).await?);
        comments
      }
      Some(page) => page.comments,
      None => Vec::new(),
    };

    Ok(IssueDetails::Full(FullIssue::from_jira(issue, &raw, comments)))
  }

  /// Fetch comments of an issue starting at `start_at` until the end of the
  /// thread.
  pub async fn get_comments(&self, issue_key: &str, start_at: u64) -> Result<Vec<JiraComment>, JiraError> {
    let mut comments: Vec<JiraComment> = Vec::new();
    let page_size = self.options.comment_page_size.to_string();

    loop {
      let offset = start_at + comments.len() as u64;
      let page: JiraCommentPage = self
        .get_json(
          self.endpoint(&["issue", issue_key, "comment"]),
          &[("startAt", offset.to_string()), ("maxResults", page_size.clone())],
          issue_key,
        )
        .await?;

      let received = page.comments.len();
      comments.extend(page.comments);
      debug!(issue_key, offset, received, total = page.total, "Fetched comment page");

      if start_at + comments.len() as u64 >= page.total {
        break;
      }
      if received == 0 {
        warn!(
          issue_key,
          total = page.total,
          fetched = comments.len(),
          "Jira returned an empty comment page before the reported total"
        );
        break;
      }
    }

    Ok(comments)
  }

  fn requested_fields(&self, full: bool) -> String {
    let mut fields: Vec<&str> = BASIC_FIELDS.to_vec();
    if full {
      fields.extend(FULL_FIELDS);
    }
    fields.extend(self.options.fields.enabled());
    fields.join(",")
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use kestrel_core::CustomFieldIds;
  use serde_json::{Value, json};
  use wiremock::matchers::{basic_auth, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::{ClientOptions, JiraAuth, JiraClient};
  use crate::error::JiraError;
  use crate::issue::IssueDetails;

  fn client_for(mock_server: &MockServer, comment_page_size: u32) -> JiraClient {
    let auth = JiraAuth::Basic {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };
    let options = ClientOptions {
      timeout: Duration::from_secs(5),
      comment_page_size,
      fields: CustomFieldIds {
        errata_link: Some("customfield_1".to_string()),
        fixed_in_build: None,
        preliminary_testing: None,
        test_coverage: None,
      },
    };
    JiraClient::with_options(&mock_server.uri(), auth, options).unwrap()
  }

  fn comment(id: &str, body: &str) -> Value {
    json!({
        "id": id,
        "author": { "displayName": "Jane Doe", "emailAddress": "jane@example.com" },
        "body": body,
        "created": "2024-01-15T10:30:00.000+0000"
    })
  }

  fn issue_body(comment_page: Option<Value>) -> Value {
    let mut fields = json!({
        "summary": "Test issue",
        "description": "This is a test issue",
        "status": { "id": "10001", "name": "In Progress" },
        "components": [{ "name": "foo" }],
        "fixVersions": [],
        "customfield_1": "https://errata.example.com/1"
    });
    if let Some(page) = comment_page {
      fields["comment"] = page;
    }
    json!({ "id": "10000", "key": "TEST-123", "fields": fields })
  }

  fn comment_bodies(details: &IssueDetails) -> Vec<String> {
    match details {
      IssueDetails::Full(full) => full.comments.iter().map(|c| c.body.clone()).collect(),
      IssueDetails::Basic(_) => panic!("expected a full issue"),
    }
  }

  #[tokio::test]
  async fn test_get_basic_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 50);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .and(basic_auth("test_user", "test_token"))
      .and(query_param(
        "fields",
        "summary,status,components,fixVersions,labels,assignee,priority,customfield_1",
      ))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(None)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let details = client.get_issue("TEST-123", false).await?;
    let IssueDetails::Basic(issue) = details else {
      panic!("expected a basic issue");
    };
    assert_eq!(issue.key, "TEST-123");
    assert_eq!(issue.summary, "Test issue");
    assert_eq!(issue.status, "In Progress");
    assert_eq!(issue.url, format!("{}/browse/TEST-123", mock_server.uri()));
    assert_eq!(issue.errata_link.as_deref(), Some("https://errata.example.com/1"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_full_issue_with_embedded_comments() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 50);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .and(query_param(
        "fields",
        "summary,status,components,fixVersions,labels,assignee,priority,description,comment,customfield_1",
      ))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(Some(json!({
          "startAt": 0,
          "maxResults": 50,
          "total": 2,
          "comments": [comment("1", "first"), comment("2", "second")]
      })))))
      .expect(1)
      .mount(&mock_server)
      .await;

    let details = client.get_issue("TEST-123", true).await?;
    assert_eq!(comment_bodies(&details), vec!["first", "second"]);

    let IssueDetails::Full(full) = details else {
      panic!("expected a full issue");
    };
    assert_eq!(full.description, "This is a test issue");
    assert_eq!(full.comments[0].author_name, "Jane Doe");
    assert_eq!(full.comments[0].author_email.as_deref(), Some("jane@example.com"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_full_issue_pages_through_comments() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 1);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(Some(json!({
          "startAt": 0,
          "maxResults": 1,
          "total": 3,
          "comments": [comment("1", "first")]
      })))))
      .mount(&mock_server)
      .await;

    for (start_at, id, body) in [("1", "2", "second"), ("2", "3", "third")] {
      Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/TEST-123/comment"))
        .and(query_param("startAt", start_at))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": start_at.parse::<u64>().unwrap(),
            "maxResults": 1,
            "total": 3,
            "comments": [comment(id, body)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    }

    let details = client.get_issue("TEST-123", true).await?;
    assert_eq!(comment_bodies(&details), vec!["first", "second", "third"]);

    Ok(())
  }

  #[tokio::test]
  async fn test_comment_paging_stops_on_empty_page() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(Some(json!({
          "startAt": 0,
          "maxResults": 1,
          "total": 5,
          "comments": [comment("1", "only")]
      })))))
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123/comment"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "startAt": 1,
          "maxResults": 10,
          "total": 5,
          "comments": []
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let details = client.get_issue("TEST-123", true).await?;
    assert_eq!(comment_bodies(&details), vec!["only"]);

    Ok(())
  }

  #[tokio::test]
  async fn test_full_issue_without_comment_field() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(None)))
      .mount(&mock_server)
      .await;

    let details = client.get_issue("TEST-123", true).await?;
    assert!(matches!(details, IssueDetails::Full(_)));
    assert!(comment_bodies(&details).is_empty());

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let error = client.get_issue("NONEXISTENT-123", false).await.unwrap_err();
    assert!(matches!(error, JiraError::NotFound { ref key } if key == "NONEXISTENT-123"));
    assert!(error.to_string().contains("not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
          "errorMessages": ["Authentication failed"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let error = client.get_issue("TEST-123", true).await.unwrap_err();
    assert!(matches!(error, JiraError::Unauthorized));
    assert!(error.to_string().contains("Authentication failed"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_forbidden_is_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(403))
      .mount(&mock_server)
      .await;

    let error = client.get_issue("TEST-123", false).await.unwrap_err();
    assert!(matches!(error, JiraError::Unauthorized));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unreachable_server() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);
    drop(mock_server);

    let error = client.get_issue("TEST-123", false).await.unwrap_err();
    assert!(matches!(error, JiraError::Request(_)));
    assert!(error.to_string().contains("Failed to reach Jira"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_server_error_keeps_body() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
      .mount(&mock_server)
      .await;

    let error = client.get_issue("TEST-123", false).await.unwrap_err();
    assert!(matches!(error, JiraError::Http { status, .. } if status.as_u16() == 502));
    assert!(error.to_string().contains("upstream unavailable"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_malformed_body() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, 10);

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "key": "TEST-123" })))
      .mount(&mock_server)
      .await;

    let error = client.get_issue("TEST-123", false).await.unwrap_err();
    assert!(matches!(error, JiraError::Decode { ref key, .. } if key == "TEST-123"));

    Ok(())
  }
}
