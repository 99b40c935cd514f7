//! Issue models returned to callers.
//!
//! [`Issue`] is the compact view agents work with most of the time;
//! [`FullIssue`] adds the description and the whole comment thread.
//! [`IssueDetails`] carries either one, tagged with `"kind"`.

use chrono::{DateTime, FixedOffset};
use kestrel_core::CustomFieldIds;
use kestrel_core::url::issue_browse_url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{JiraComment, JiraIssue, JiraIssueFields};

/// Basic issue details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub key: String,
  pub url: String,
  pub summary: String,
  pub status: String,
  pub components: Vec<String>,
  pub fix_versions: Vec<String>,
  #[serde(default)]
  pub labels: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub errata_link: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fixed_in_build: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preliminary_testing: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub test_coverage: Option<Vec<String>>,
}

/// A single comment on an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id: String,
  pub author_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author_email: Option<String>,
  pub created: DateTime<FixedOffset>,
  pub body: String,
}

/// Issue details plus description and comment thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullIssue {
  #[serde(flatten)]
  pub issue: Issue,
  pub description: String,
  pub comments: Vec<Comment>,
}

/// Result of an issue lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueDetails {
  Basic(Issue),
  Full(FullIssue),
}

impl Issue {
  /// Map a raw Jira issue, reading custom fields by the configured ids.
  pub fn from_jira(raw: &JiraIssue, base_url: &str, field_ids: &CustomFieldIds) -> Self {
    let fields = &raw.fields;

    Self {
      key: raw.key.clone(),
      url: issue_browse_url(base_url, &raw.key),
      summary: fields.summary.clone(),
      status: fields.status.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
      components: fields.components.iter().map(|c| c.name.clone()).collect(),
      fix_versions: fields.fix_versions.iter().map(|v| v.name.clone()).collect(),
      labels: fields.labels.clone(),
      assignee: fields.assignee.as_ref().map(|a| a.display_name.clone()),
      priority: fields.priority.as_ref().map(|p| p.name.clone()),
      errata_link: custom_field(fields, &field_ids.errata_link).and_then(option_text),
      fixed_in_build: custom_field(fields, &field_ids.fixed_in_build).and_then(option_text),
      preliminary_testing: custom_field(fields, &field_ids.preliminary_testing).and_then(option_text),
      test_coverage: custom_field(fields, &field_ids.test_coverage).and_then(option_list),
    }
  }
}

impl FullIssue {
  pub fn from_jira(issue: Issue, raw: &JiraIssue, comments: Vec<JiraComment>) -> Self {
    Self {
      issue,
      description: raw.fields.description.clone().unwrap_or_default(),
      comments: comments.into_iter().map(Comment::from).collect(),
    }
  }
}

impl From<JiraComment> for Comment {
  fn from(comment: JiraComment) -> Self {
    let (author_name, author_email) = match comment.author {
      Some(author) => (author.display_name, author.email_address),
      None => (String::new(), None),
    };

    Self {
      id: comment.id,
      author_name,
      author_email,
      created: comment.created,
      body: comment.body,
    }
  }
}

fn custom_field<'a>(fields: &'a JiraIssueFields, id: &Option<String>) -> Option<&'a Value> {
  id.as_deref().and_then(|id| fields.extra.get(id))
}

/// Text of a custom field holding either a plain string or a select option.
fn option_text(value: &Value) -> Option<String> {
  match value {
    Value::String(text) if !text.is_empty() => Some(text.clone()),
    Value::Object(option) => option_value(option),
    _ => None,
  }
}

/// Values of a multi-select custom field. A single option counts as a
/// one-element list.
fn option_list(value: &Value) -> Option<Vec<String>> {
  match value {
    Value::Array(items) => Some(
      items
        .iter()
        .filter_map(|item| item.as_object().and_then(option_value).or_else(|| option_text(item)))
        .collect(),
    ),
    other => option_text(other).map(|text| vec![text]),
  }
}

fn option_value(option: &Map<String, Value>) -> Option<String> {
  option.get("value").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn field_ids() -> CustomFieldIds {
    CustomFieldIds {
      errata_link: Some("customfield_1".to_string()),
      fixed_in_build: Some("customfield_2".to_string()),
      preliminary_testing: Some("customfield_3".to_string()),
      test_coverage: Some("customfield_4".to_string()),
    }
  }

  fn raw_issue(fields: Value) -> JiraIssue {
    serde_json::from_value(json!({ "id": "10000", "key": "RHEL-123", "fields": fields })).unwrap()
  }

  #[test]
  fn test_issue_from_jira_maps_standard_fields() {
    let raw = raw_issue(json!({
        "summary": "Rebase foo",
        "status": { "name": "New" },
        "components": [{ "name": "foo" }, { "name": "bar" }],
        "fixVersions": [{ "name": "rhel-10.1" }],
        "assignee": { "displayName": "Jane Doe" },
        "priority": { "name": "Major" }
    }));

    let issue = Issue::from_jira(&raw, "https://issues.example.com/", &field_ids());

    assert_eq!(issue.key, "RHEL-123");
    assert_eq!(issue.url, "https://issues.example.com/browse/RHEL-123");
    assert_eq!(issue.status, "New");
    assert_eq!(issue.components, vec!["foo", "bar"]);
    assert_eq!(issue.fix_versions, vec!["rhel-10.1"]);
    assert_eq!(issue.assignee.as_deref(), Some("Jane Doe"));
    assert_eq!(issue.priority.as_deref(), Some("Major"));
    assert!(issue.errata_link.is_none());
  }

  #[test]
  fn test_issue_from_jira_maps_custom_fields() {
    let raw = raw_issue(json!({
        "summary": "Rebase foo",
        "status": { "name": "Integration" },
        "customfield_1": "https://errata.example.com/advisory/1",
        "customfield_2": "",
        "customfield_3": { "value": "Pass", "id": "7" },
        "customfield_4": [{ "value": "Manual" }, { "value": "RegressionOnly" }]
    }));

    let issue = Issue::from_jira(&raw, "https://issues.example.com", &field_ids());

    assert_eq!(issue.errata_link.as_deref(), Some("https://errata.example.com/advisory/1"));
    assert!(issue.fixed_in_build.is_none());
    assert_eq!(issue.preliminary_testing.as_deref(), Some("Pass"));
    assert_eq!(
      issue.test_coverage,
      Some(vec!["Manual".to_string(), "RegressionOnly".to_string()])
    );
  }

  #[test]
  fn test_disabled_custom_fields_are_ignored() {
    let raw = raw_issue(json!({ "customfield_1": "https://errata.example.com/advisory/1" }));
    let ids = CustomFieldIds {
      errata_link: None,
      ..field_ids()
    };

    assert!(Issue::from_jira(&raw, "https://x", &ids).errata_link.is_none());
  }

  #[test]
  fn test_basic_serialization_omits_unset_fields() {
    let raw = raw_issue(json!({ "summary": "S", "status": { "name": "New" } }));
    let details = IssueDetails::Basic(Issue::from_jira(&raw, "https://x", &field_ids()));

    let value = serde_json::to_value(&details).unwrap();
    assert_eq!(
      value,
      json!({
          "kind": "basic",
          "key": "RHEL-123",
          "url": "https://x/browse/RHEL-123",
          "summary": "S",
          "status": "New",
          "components": [],
          "fix_versions": [],
          "labels": []
      })
    );
  }

  #[test]
  fn test_full_issue_serialization() {
    let raw = raw_issue(json!({ "summary": "S", "status": { "name": "New" }, "description": "Details" }));
    let comment: JiraComment = serde_json::from_value(json!({
        "id": "9",
        "author": null,
        "body": "first",
        "created": "2024-03-01T08:00:00.000+0100"
    }))
    .unwrap();

    let issue = Issue::from_jira(&raw, "https://x", &field_ids());
    let details = IssueDetails::Full(FullIssue::from_jira(issue, &raw, vec![comment]));
    assert!(matches!(&details, IssueDetails::Full(full) if full.issue.key == "RHEL-123"));

    let value = serde_json::to_value(&details).unwrap();
    assert_eq!(value["kind"], "full");
    assert_eq!(value["key"], "RHEL-123");
    assert_eq!(value["description"], "Details");
    assert_eq!(
      value["comments"],
      json!([{
          "id": "9",
          "author_name": "",
          "created": "2024-03-01T08:00:00+01:00",
          "body": "first"
      }])
    );
  }
}
