//! Normalized project item

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fold_tag;

/// Custom field key synthesized from a parent-issue field
pub const PARENT_ISSUE_FIELD: &str = "Parent issue";

/// Kind of content behind a project item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    #[default]
    Issue,
    PullRequest,
    DraftIssue,
}

impl ItemType {
    /// Map a content type tag (`Issue`, `PULL_REQUEST`, `DraftIssue`, ...)
    ///
    /// Unrecognized tags fall back to [`ItemType::Issue`].
    pub fn from_tag(tag: &str) -> Self {
        match fold_tag(tag).as_str() {
            "pullrequest" | "pr" => ItemType::PullRequest,
            "draftissue" | "draft" => ItemType::DraftIssue,
            _ => ItemType::Issue,
        }
    }

    /// Wire name (`ISSUE`, `PULL_REQUEST`, `DRAFT_ISSUE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Issue => "ISSUE",
            ItemType::PullRequest => "PULL_REQUEST",
            ItemType::DraftIssue => "DRAFT_ISSUE",
        }
    }

    /// Short label for tables
    pub fn short_label(&self) -> &'static str {
        match self {
            ItemType::Issue => "Issue",
            ItemType::PullRequest => "PR",
            ItemType::DraftIssue => "Draft",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigned user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub login: String,
    pub avatar_url: String,
}

/// Issue or pull request label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

/// Custom field values keyed by the field's display name
///
/// Keys are whatever the project's field schema defines. Lookups are exact
/// by default; [`CustomFields::get_ignore_case`] is the single place where
/// field names are compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFields(BTreeMap<String, String>);

impl CustomFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Exact lookup first, then the first key equal ignoring case
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }
        let folded = name.to_lowercase();
        self.0
            .iter()
            .find(|(key, _)| key.to_lowercase() == folded)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Flat, uniform representation of a project item
///
/// Built once per fetch by [`normalize`](super::normalize) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub number: Option<u64>,
    pub title: String,
    pub url: String,
    /// Free-form state from the source ("open", "closed", "merged", ...)
    pub state: String,
    pub repository: String,
    pub repository_owner: String,
    pub assignees: Vec<Assignee>,
    pub labels: Vec<Label>,
    pub created_at: String,
    pub updated_at: String,
    /// Copy of `custom_fields["Status"]`
    pub status: Option<String>,
    /// Copy of `custom_fields["Priority"]`
    pub priority: Option<String>,
    pub custom_fields: CustomFields,
}

impl NormalizedItem {
    /// `owner/name`, or just the name when the owner is unknown
    pub fn full_repository(&self) -> String {
        if self.repository_owner == "Unknown" {
            self.repository.clone()
        } else {
            format!("{}/{}", self.repository_owner, self.repository)
        }
    }

    /// Display reference such as `#42` (drafts have none)
    pub fn reference(&self) -> Option<String> {
        self.number.map(|n| format!("#{}", n))
    }

    /// Value of the synthesized "Parent issue" field
    pub fn parent_issue(&self) -> Option<&str> {
        self.custom_fields.get(PARENT_ISSUE_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_from_tag() {
        assert_eq!(ItemType::from_tag("Issue"), ItemType::Issue);
        assert_eq!(ItemType::from_tag("ISSUE"), ItemType::Issue);
        assert_eq!(ItemType::from_tag("PullRequest"), ItemType::PullRequest);
        assert_eq!(ItemType::from_tag("PULL_REQUEST"), ItemType::PullRequest);
        assert_eq!(ItemType::from_tag("DraftIssue"), ItemType::DraftIssue);
        assert_eq!(ItemType::from_tag("DRAFT_ISSUE"), ItemType::DraftIssue);
        assert_eq!(ItemType::from_tag("REDACTED"), ItemType::Issue);
        assert_eq!(ItemType::from_tag(""), ItemType::Issue);
    }

    #[test]
    fn test_item_type_serde() {
        let json = serde_json::to_string(&ItemType::PullRequest).unwrap();
        assert_eq!(json, "\"PULL_REQUEST\"");
        let parsed: ItemType = serde_json::from_str("\"DRAFT_ISSUE\"").unwrap();
        assert_eq!(parsed, ItemType::DraftIssue);
    }

    #[test]
    fn test_custom_fields_lookup() {
        let fields: CustomFields = [("Status", "Done"), ("sprint", "Sprint 3")]
            .into_iter()
            .collect();

        assert_eq!(fields.get("Status"), Some("Done"));
        assert_eq!(fields.get("status"), None);
        assert_eq!(fields.get_ignore_case("status"), Some("Done"));
        assert_eq!(fields.get_ignore_case("SPRINT"), Some("Sprint 3"));
        assert_eq!(fields.get_ignore_case("Size"), None);
    }

    #[test]
    fn test_custom_fields_exact_match_preferred() {
        let fields: CustomFields = [("status", "lower"), ("Status", "upper")]
            .into_iter()
            .collect();
        assert_eq!(fields.get_ignore_case("Status"), Some("upper"));
        assert_eq!(fields.get_ignore_case("status"), Some("lower"));
    }

    #[test]
    fn test_custom_fields_serialize_as_map() {
        let fields: CustomFields = [("Size", "3")].into_iter().collect();
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({"Size": "3"}));
    }
}
