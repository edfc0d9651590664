//! Raw project items as returned by the GitHub Projects V2 REST API
//!
//! The shapes are deliberately loose: every attribute is optional or
//! defaulted so that one odd item never fails a whole page. Lists accept
//! either a bare array (REST) or a `{ "nodes": [...] }` connection (GraphQL).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One project item: content plus its custom field values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    /// Numeric REST id or GraphQL node id
    #[serde(default)]
    pub id: Value,
    #[serde(default, alias = "nodeId")]
    pub node_id: Option<String>,
    /// `Issue`, `PullRequest`, `DraftIssue` (or the GraphQL `ISSUE` spelling)
    #[serde(default, alias = "contentType", alias = "type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: Option<RawContent>,
    #[serde(default, deserialize_with = "list_or_nodes")]
    pub fields: Vec<RawField>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Issue, pull request or draft issue behind a project item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContent {
    /// Content type tag; REST issues may carry an issue-type object here
    #[serde(default, rename = "type", alias = "__typename")]
    pub kind: Value,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "htmlUrl")]
    pub html_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default, alias = "mergedAt")]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub repository: Option<RawRepository>,
    #[serde(default, alias = "repositoryUrl")]
    pub repository_url: Option<String>,
    #[serde(default, deserialize_with = "list_or_nodes")]
    pub assignees: Vec<RawUser>,
    #[serde(default, deserialize_with = "list_or_nodes")]
    pub labels: Vec<RawLabel>,
    #[serde(default)]
    pub milestone: Option<RawMilestone>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,
}

impl RawContent {
    /// Content type tag when the source sent one as a string
    pub fn kind_tag(&self) -> Option<&str> {
        self.kind.as_str()
    }
}

/// Structured repository reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRepository {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "fullName", alias = "nameWithOwner")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub owner: Option<RawUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub login: String,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLabel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMilestone {
    #[serde(default)]
    pub title: Option<String>,
}

/// One custom field value on an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
    /// Type discriminator (`single_select`, `SINGLE_SELECT`, ...)
    #[serde(default, rename = "type", alias = "data_type", alias = "dataType")]
    pub data_type: String,
    #[serde(default)]
    pub value: Value,
}

impl RawField {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, value: Value) -> Self {
        Self {
            id: Value::Null,
            name: name.into(),
            data_type: data_type.into(),
            value,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrNodes<T> {
    List(Vec<T>),
    Nodes { nodes: Vec<T> },
}

fn list_or_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<ListOrNodes<T>>::deserialize(deserializer)? {
        Some(ListOrNodes::List(items)) => items,
        Some(ListOrNodes::Nodes { nodes }) => nodes,
        None => Vec::new(),
    })
}
