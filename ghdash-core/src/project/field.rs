//! Field extraction
//!
//! Project field values arrive as loosely typed JSON tagged with a type
//! discriminator. [`FieldValue::from_raw`] decodes the payload for its
//! declared [`FieldKind`] and [`FieldValue::extract`] renders it as the single
//! string stored in a normalized item's custom fields.
//!
//! A payload whose shape does not match its declared kind is kept as
//! [`FieldValue::Other`] and rendered generically, so no field is silently
//! dropped. Only absent values (`null`) and references without a number
//! produce nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::fold_tag;

/// Field type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    SingleSelect,
    Date,
    Iteration,
    Milestone,
    ParentIssue,
    PullRequest,
    Issue,
    Repository,
    Assignees,
    Labels,
    Reviewers,
    Unknown,
}

impl FieldKind {
    /// Classify a type tag
    ///
    /// Accepts REST (`single_select`), GraphQL data types (`SINGLE_SELECT`)
    /// and GraphQL value typenames (`ProjectV2ItemFieldSingleSelectValue`).
    pub fn from_tag(tag: &str) -> Self {
        let folded = fold_tag(tag);
        let core = folded
            .strip_prefix("projectv2itemfield")
            .and_then(|rest| rest.strip_suffix("value"))
            .unwrap_or(&folded);

        match core {
            "text" | "title" => FieldKind::Text,
            "number" => FieldKind::Number,
            "singleselect" => FieldKind::SingleSelect,
            "date" => FieldKind::Date,
            "iteration" => FieldKind::Iteration,
            "milestone" => FieldKind::Milestone,
            "parentissue" => FieldKind::ParentIssue,
            "pullrequest" | "pullrequests" | "linkedpullrequests" => FieldKind::PullRequest,
            "issue" | "issues" | "trackedissues" | "trackedinissues" => FieldKind::Issue,
            "repository" => FieldKind::Repository,
            "assignees" => FieldKind::Assignees,
            "labels" => FieldKind::Labels,
            "reviewers" => FieldKind::Reviewers,
            _ => FieldKind::Unknown,
        }
    }

    /// Built-in fields that repeat what the item content already carries
    ///
    /// The normalizer takes assignees, labels and repository from the content,
    /// so these field values are not copied into custom fields.
    pub fn mirrors_content(&self) -> bool {
        matches!(
            self,
            FieldKind::Assignees | FieldKind::Labels | FieldKind::Repository
        )
    }
}

/// Reference to an issue or pull request held in a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReference {
    pub number: u64,
    pub title: String,
    /// Repository as `owner/name` (or whatever the source supplied)
    pub repository: Option<String>,
}

impl IssueReference {
    /// Decode a reference object; `None` without a usable number
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let number = match obj.get("number")? {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.trim().trim_start_matches('#').parse().ok()?,
            _ => return None,
        };
        let title = obj.get("title").and_then(text_of).unwrap_or_default();
        let repository = obj.get("repository").and_then(repository_name);

        Some(Self {
            number,
            title,
            repository,
        })
    }

    /// First reference of a list, a `{ nodes: [...] }` connection or a
    /// single object
    fn first_of(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.first().and_then(Self::from_value),
            Value::Object(obj) => match obj.get("nodes") {
                Some(Value::Array(nodes)) => nodes.first().and_then(Self::from_value),
                _ => Self::from_value(value),
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.repository {
            Some(repo) => write!(f, "{}#{} {}", repo, self.number, self.title),
            None => write!(f, "#{} {}", self.number, self.title),
        }
    }
}

/// Decoded field value, one variant per field kind
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    SingleSelect { name: String },
    Date(String),
    Iteration { title: String },
    Milestone { title: String },
    ParentIssue(IssueReference),
    PullRequest(IssueReference),
    Issue(IssueReference),
    Repository { owner: String, name: String },
    /// Logins or label names, in listed order
    Names(Vec<String>),
    /// Unrecognized kind or unexpected payload shape
    Other(Value),
}

impl FieldValue {
    /// Decode a raw payload for the given kind
    ///
    /// Returns `None` when the value is absent (`null`) or when a reference
    /// kind carries no resolvable reference.
    pub fn from_raw(kind: FieldKind, value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }

        let decoded = match kind {
            FieldKind::Text => text_of(value).map(FieldValue::Text),
            FieldKind::Number => match value {
                Value::Number(n) => Some(FieldValue::Number(n.clone())),
                _ => None,
            },
            FieldKind::SingleSelect => {
                named(value, "name").map(|name| FieldValue::SingleSelect { name })
            }
            FieldKind::Date => value.as_str().map(|d| FieldValue::Date(d.to_string())),
            FieldKind::Iteration => {
                named(value, "title").map(|title| FieldValue::Iteration { title })
            }
            FieldKind::Milestone => {
                named(value, "title").map(|title| FieldValue::Milestone { title })
            }
            FieldKind::ParentIssue => {
                return IssueReference::from_value(value).map(FieldValue::ParentIssue);
            }
            FieldKind::PullRequest => {
                return IssueReference::first_of(value).map(FieldValue::PullRequest);
            }
            FieldKind::Issue => {
                return IssueReference::first_of(value).map(FieldValue::Issue);
            }
            FieldKind::Repository => {
                repository_parts(value).map(|(owner, name)| FieldValue::Repository { owner, name })
            }
            FieldKind::Assignees | FieldKind::Reviewers => {
                names_of(value, "login").map(FieldValue::Names)
            }
            FieldKind::Labels => names_of(value, "name").map(FieldValue::Names),
            FieldKind::Unknown => None,
        };

        Some(decoded.unwrap_or_else(|| FieldValue::Other(value.clone())))
    }

    /// Render the value as a single string
    pub fn extract(&self) -> String {
        match self {
            FieldValue::Text(text) | FieldValue::Date(text) => text.clone(),
            FieldValue::Number(n) => format_number(n),
            FieldValue::SingleSelect { name } => name.clone(),
            FieldValue::Iteration { title } | FieldValue::Milestone { title } => title.clone(),
            FieldValue::ParentIssue(reference)
            | FieldValue::PullRequest(reference)
            | FieldValue::Issue(reference) => reference.to_string(),
            FieldValue::Repository { owner, name } => format!("{}/{}", owner, name),
            FieldValue::Names(names) => names.join(", "),
            FieldValue::Other(value) => stringify_generic(value),
        }
    }
}

/// Decode and render in one step; `None` for absent values
pub fn extract_value(tag: &str, value: &Value) -> Option<String> {
    FieldValue::from_raw(FieldKind::from_tag(tag), value)
        .map(|v| v.extract())
}

/// Plain string, or the `raw`/`text` member of a `{ raw, html }` wrapper
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => ["raw", "text"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Text of `value[key]` when `value` is an object, else of `value` itself
fn named(value: &Value, key: &str) -> Option<String> {
    match value {
        Value::Object(obj) => obj.get(key).and_then(text_of),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// `key` of every entry of a list or `{ nodes: [...] }` connection
///
/// Entries without `key` fall back to their `name` (review teams have no
/// login).
fn names_of(value: &Value, key: &str) -> Option<Vec<String>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj.get("nodes")?.as_array()?,
        _ => return None,
    };
    Some(
        list.iter()
            .filter_map(|entry| named(entry, key).or_else(|| named(entry, "name")))
            .collect(),
    )
}

fn repository_parts(value: &Value) -> Option<(String, String)> {
    let full = match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => {
            let name = obj.get("name").and_then(Value::as_str);
            let owner = obj
                .get("owner")
                .and_then(|o| o.get("login").and_then(Value::as_str).or_else(|| o.as_str()));
            match (owner, name) {
                (Some(owner), Some(name)) => return Some((owner.to_string(), name.to_string())),
                _ => full_name_of(obj)?,
            }
        }
        _ => return None,
    };

    let (owner, name) = full.split_once('/')?;
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

fn full_name_of(obj: &Map<String, Value>) -> Option<String> {
    ["full_name", "nameWithOwner", "fullName"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Repository label for a reference: `owner/name`, a full name, or a bare
/// name string
fn repository_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => repository_parts(value)
            .map(|(owner, name)| format!("{}/{}", owner, name))
            .or_else(|| full_name_of(obj))
            .or_else(|| obj.get("name").and_then(Value::as_str).map(str::to_string)),
        _ => None,
    }
}

/// Integers print without a fractional part, like `3` rather than `3.0`
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

fn stringify_generic(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Object(obj) => ["name", "title", "raw"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(text_of))
            .unwrap_or_else(|| value.to_string()),
        Value::Array(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_tag_spellings() {
        assert_eq!(FieldKind::from_tag("single_select"), FieldKind::SingleSelect);
        assert_eq!(FieldKind::from_tag("SINGLE_SELECT"), FieldKind::SingleSelect);
        assert_eq!(
            FieldKind::from_tag("ProjectV2ItemFieldSingleSelectValue"),
            FieldKind::SingleSelect
        );
        assert_eq!(FieldKind::from_tag("parent_issue"), FieldKind::ParentIssue);
        assert_eq!(
            FieldKind::from_tag("ProjectV2ItemFieldPullRequestValue"),
            FieldKind::PullRequest
        );
        assert_eq!(FieldKind::from_tag("linked_pull_requests"), FieldKind::PullRequest);
        assert_eq!(FieldKind::from_tag("sub_issues_progress"), FieldKind::Unknown);
    }

    #[test]
    fn test_text_extraction() {
        assert_eq!(extract_value("text", &json!("hello")), Some("hello".to_string()));
        assert_eq!(
            extract_value("text", &json!({"raw": "wrapped", "html": "<p>wrapped</p>"})),
            Some("wrapped".to_string())
        );
    }

    #[test]
    fn test_empty_string_is_kept_but_null_is_skipped() {
        assert_eq!(extract_value("text", &json!("")), Some(String::new()));
        assert_eq!(extract_value("text", &Value::Null), None);
        assert_eq!(extract_value("single_select", &Value::Null), None);
    }

    #[test]
    fn test_number_extraction() {
        assert_eq!(extract_value("number", &json!(3)), Some("3".to_string()));
        assert_eq!(extract_value("number", &json!(2.5)), Some("2.5".to_string()));
        assert_eq!(extract_value("number", &json!(5.0)), Some("5".to_string()));
        assert_eq!(extract_value("number", &json!("8")), Some("8".to_string()));
    }

    #[test]
    fn test_single_select_and_iteration() {
        assert_eq!(
            extract_value("single_select", &json!({"id": "opt1", "name": "In Progress"})),
            Some("In Progress".to_string())
        );
        assert_eq!(
            extract_value("single_select", &json!({"name": {"raw": "Done", "html": "Done"}})),
            Some("Done".to_string())
        );
        assert_eq!(
            extract_value("iteration", &json!({"title": "Sprint 4", "duration": 14})),
            Some("Sprint 4".to_string())
        );
        assert_eq!(
            extract_value("milestone", &json!({"title": "v1.0"})),
            Some("v1.0".to_string())
        );
        assert_eq!(extract_value("date", &json!("2024-05-01")), Some("2024-05-01".to_string()));
    }

    #[test]
    fn test_parent_issue_formats() {
        assert_eq!(
            extract_value(
                "parent_issue",
                &json!({"number": 416, "title": "Epic", "repository": "acme/issues"})
            ),
            Some("acme/issues#416 Epic".to_string())
        );
        assert_eq!(
            extract_value("parent_issue", &json!({"number": 12, "title": "Epic"})),
            Some("#12 Epic".to_string())
        );
        assert_eq!(
            extract_value(
                "parent_issue",
                &json!({
                    "number": 3,
                    "title": "T",
                    "repository": {"name": "web", "owner": {"login": "acme"}}
                })
            ),
            Some("acme/web#3 T".to_string())
        );
        assert_eq!(extract_value("parent_issue", &json!({"title": "No number"})), None);
    }

    #[test]
    fn test_pull_request_reference_uses_first() {
        let value = json!({"nodes": [
            {"number": 10, "title": "First"},
            {"number": 11, "title": "Second"}
        ]});
        assert_eq!(extract_value("pull_request", &value), Some("#10 First".to_string()));

        let list = json!([{"number": 5, "title": "Only", "repository": "acme/api"}]);
        assert_eq!(extract_value("pull_request", &list), Some("acme/api#5 Only".to_string()));

        assert_eq!(extract_value("pull_request", &json!([])), None);
    }

    #[test]
    fn test_repository_reference() {
        assert_eq!(
            extract_value("repository", &json!({"name": "web", "owner": {"login": "acme"}})),
            Some("acme/web".to_string())
        );
        assert_eq!(
            extract_value("repository", &json!({"full_name": "acme/api"})),
            Some("acme/api".to_string())
        );
    }

    #[test]
    fn test_user_and_label_lists() {
        let users = json!([
            {"login": "alice", "id": 7, "avatar_url": "u"},
            {"login": "bob", "id": 8}
        ]);
        assert_eq!(extract_value("assignees", &users), Some("alice, bob".to_string()));
        let reviewers = json!({"nodes": [{"login": "carol"}, {"name": "core-team"}]});
        assert_eq!(
            extract_value("REVIEWERS", &reviewers),
            Some("carol, core-team".to_string())
        );
        assert_eq!(
            extract_value("labels", &json!([{"id": 3, "name": "bug", "color": "f00"}])),
            Some("bug".to_string())
        );
        assert_eq!(extract_value("labels", &json!([])), Some(String::new()));
    }

    #[test]
    fn test_content_mirrors() {
        assert!(FieldKind::from_tag("ASSIGNEES").mirrors_content());
        assert!(FieldKind::from_tag("labels").mirrors_content());
        assert!(FieldKind::from_tag("repository").mirrors_content());
        assert!(!FieldKind::from_tag("reviewers").mirrors_content());
        assert!(!FieldKind::from_tag("single_select").mirrors_content());
    }

    #[test]
    fn test_unknown_object_fallbacks() {
        assert_eq!(
            extract_value("issue_type", &json!({"id": 1, "name": "Bug"})),
            Some("Bug".to_string())
        );
        assert_eq!(
            extract_value("custom", &json!({"title": "Titled"})),
            Some("Titled".to_string())
        );
        assert_eq!(
            extract_value("custom", &json!({"raw": "Raw text"})),
            Some("Raw text".to_string())
        );
        assert_eq!(
            extract_value("sub_issues_progress", &json!({"completed": 1, "total": 3})),
            Some(r#"{"completed":1,"total":3}"#.to_string())
        );
    }

    #[test]
    fn test_unknown_scalar_fallbacks() {
        assert_eq!(extract_value("custom", &json!(true)), Some("true".to_string()));
        assert_eq!(extract_value("custom", &json!(42)), Some("42".to_string()));
        assert_eq!(extract_value("custom", &json!("plain")), Some("plain".to_string()));
    }

    #[test]
    fn test_mismatched_shape_is_not_dropped() {
        // single_select declared, but the payload has no name
        assert_eq!(
            extract_value("single_select", &json!({"title": "Odd"})),
            Some("Odd".to_string())
        );
        assert_eq!(extract_value("number", &json!({"raw": "7"})), Some("7".to_string()));
    }
}
