//! Raw item → [`NormalizedItem`]

use tracing::{debug, trace};
use url::Url;

use super::field::{FieldKind, FieldValue};
use super::item::{Assignee, CustomFields, ItemType, Label, NormalizedItem, PARENT_ISSUE_FIELD};
use super::raw::{RawContent, RawItem};

const UNKNOWN: &str = "Unknown";

/// Flatten one raw project item
///
/// Never fails: missing attributes fall back to defaults (`"Unknown"`
/// repository, `"open"` state, empty lists).
pub fn normalize(raw: &RawItem) -> NormalizedItem {
    let empty = RawContent::default();
    let content = raw.content.as_ref().unwrap_or(&empty);

    let item_type = raw
        .content_type
        .as_deref()
        .or_else(|| content.kind_tag())
        .map(ItemType::from_tag)
        .unwrap_or_default();

    let (repository_owner, repository) = resolve_repository(content);

    let mut custom_fields = CustomFields::new();
    for field in &raw.fields {
        let kind = FieldKind::from_tag(&field.data_type);
        if kind.mirrors_content() {
            trace!(field = %field.name, "Skipping field already carried by content");
            continue;
        }
        let Some(value) = FieldValue::from_raw(kind, &field.value) else {
            trace!(field = %field.name, "Skipping empty field value");
            continue;
        };

        let key = if kind == FieldKind::ParentIssue {
            PARENT_ISSUE_FIELD
        } else {
            field.name.as_str()
        };
        if key.is_empty() {
            continue;
        }
        custom_fields.insert(key, value.extract());
    }

    if !custom_fields.contains_key("Milestone") {
        if let Some(title) = content.milestone.as_ref().and_then(|m| m.title.as_deref()) {
            custom_fields.insert("Milestone", title);
        }
    }

    let status = custom_fields.get("Status").map(str::to_string);
    let priority = custom_fields.get("Priority").map(str::to_string);

    let id = raw.node_id.clone().unwrap_or_else(|| match &raw.id {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    });

    let item = NormalizedItem {
        id,
        item_type,
        number: content.number,
        title: content.title.clone().unwrap_or_default(),
        url: content
            .html_url
            .clone()
            .or_else(|| content.url.clone())
            .unwrap_or_else(|| "#".to_string()),
        state: resolve_state(item_type, content),
        repository,
        repository_owner,
        assignees: content
            .assignees
            .iter()
            .map(|u| Assignee {
                login: u.login.clone(),
                avatar_url: u.avatar_url.clone(),
            })
            .collect(),
        labels: content
            .labels
            .iter()
            .map(|l| Label {
                name: l.name.clone(),
                color: l.color.clone(),
            })
            .collect(),
        created_at: content
            .created_at
            .clone()
            .or_else(|| raw.created_at.clone())
            .unwrap_or_default(),
        updated_at: content
            .updated_at
            .clone()
            .or_else(|| raw.updated_at.clone())
            .unwrap_or_default(),
        status,
        priority,
        custom_fields,
    };

    trace!(
        id = %item.id,
        item_type = %item.item_type,
        fields = item.custom_fields.len(),
        "Normalized project item"
    );

    item
}

/// Normalize a page of items, skipping entries without content
pub fn normalize_all(raw: &[RawItem]) -> Vec<NormalizedItem> {
    let items: Vec<NormalizedItem> = raw
        .iter()
        .filter(|item| item.content.is_some())
        .map(normalize)
        .collect();

    debug!(
        raw = raw.len(),
        normalized = items.len(),
        "Normalized project items"
    );

    items
}

fn resolve_state(item_type: ItemType, content: &RawContent) -> String {
    if item_type == ItemType::PullRequest
        && (content.merged == Some(true) || content.merged_at.is_some())
    {
        return "merged".to_string();
    }
    content
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("open")
        .to_string()
}

/// `(owner, name)` of the content's repository
fn resolve_repository(content: &RawContent) -> (String, String) {
    if let Some(repo) = &content.repository {
        let owner = repo
            .owner
            .as_ref()
            .map(|o| o.login.as_str())
            .filter(|l| !l.is_empty());
        match (owner, repo.name.as_deref()) {
            (Some(owner), Some(name)) if !name.is_empty() => {
                return (owner.to_string(), name.to_string());
            }
            _ => {}
        }
        if let Some((owner, name)) = repo.full_name.as_deref().and_then(|f| f.split_once('/')) {
            return (owner.to_string(), name.to_string());
        }
    }

    if let Some(parsed) = content
        .repository_url
        .as_deref()
        .and_then(parse_repository_url)
    {
        return parsed;
    }

    (UNKNOWN.to_string(), UNKNOWN.to_string())
}

/// Extract `(owner, repo)` from a `.../repos/{owner}/{repo}` API URL
///
/// # Examples
/// ```
/// use ghdash_core::project::parse_repository_url;
///
/// assert_eq!(
///     parse_repository_url("https://api.github.com/repos/acme/web"),
///     Some(("acme".to_string(), "web".to_string()))
/// );
/// assert_eq!(parse_repository_url("https://github.com/acme/web"), None);
/// ```
pub fn parse_repository_url(url: &str) -> Option<(String, String)> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|s| *s == "repos")?;
    let owner = segments.next()?;
    let repo = segments.next()?;

    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::RawField;
    use serde_json::json;

    fn raw_item(value: serde_json::Value) -> RawItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_rest_issue() {
        let raw = raw_item(json!({
            "id": 101,
            "node_id": "PVTI_1",
            "content_type": "Issue",
            "content": {
                "number": 7,
                "title": "Fix login",
                "html_url": "https://github.com/acme/web/issues/7",
                "state": "open",
                "repository_url": "https://api.github.com/repos/acme/web",
                "assignees": [{"login": "alice", "avatar_url": "https://a/alice.png"}],
                "labels": [{"name": "bug", "color": "d73a4a"}],
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-05T00:00:00Z"
            },
            "fields": [
                {"name": "Status", "data_type": "single_select", "value": {"name": "In Progress"}},
                {"name": "Priority", "data_type": "single_select", "value": {"name": "P1"}},
                {"name": "Estimate", "data_type": "number", "value": 3}
            ]
        }));

        let item = normalize(&raw);
        assert_eq!(item.id, "PVTI_1");
        assert_eq!(item.item_type, ItemType::Issue);
        assert_eq!(item.number, Some(7));
        assert_eq!(item.repository, "web");
        assert_eq!(item.repository_owner, "acme");
        assert_eq!(item.status.as_deref(), Some("In Progress"));
        assert_eq!(item.priority.as_deref(), Some("P1"));
        assert_eq!(item.custom_fields.get("Estimate"), Some("3"));
        assert_eq!(item.assignees[0].login, "alice");
        assert_eq!(item.labels[0].name, "bug");
        assert_eq!(item.updated_at, "2024-01-05T00:00:00Z");
    }

    #[test]
    fn test_normalize_is_total_for_empty_item() {
        let item = normalize(&RawItem::default());
        assert_eq!(item.item_type, ItemType::Issue);
        assert_eq!(item.repository, "Unknown");
        assert_eq!(item.repository_owner, "Unknown");
        assert_eq!(item.state, "open");
        assert_eq!(item.url, "#");
        assert!(item.title.is_empty());
        assert!(item.custom_fields.is_empty());
        assert!(item.status.is_none());
    }

    #[test]
    fn test_status_round_trip() {
        for status in ["Todo", "In Progress", "Done", ""] {
            let raw = RawItem {
                content: Some(RawContent::default()),
                fields: vec![RawField::new("Status", "single_select", json!({"name": status}))],
                ..Default::default()
            };
            let item = normalize(&raw);
            assert_eq!(item.status.as_deref(), Some(status));
            assert_eq!(item.custom_fields.get("Status"), Some(status));
        }
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let raw = RawItem {
            fields: vec![RawField::new("status", "single_select", json!({"name": "Done"}))],
            ..Default::default()
        };
        let item = normalize(&raw);
        assert!(item.status.is_none());
        assert_eq!(item.custom_fields.get("status"), Some("Done"));
    }

    #[test]
    fn test_parent_issue_synthesized() {
        let raw = RawItem {
            fields: vec![RawField::new(
                "Parent",
                "parent_issue",
                json!({"number": 416, "title": "Epic", "repository": "acme/issues"}),
            )],
            ..Default::default()
        };
        let item = normalize(&raw);
        assert_eq!(item.parent_issue(), Some("acme/issues#416 Epic"));
        assert!(!item.custom_fields.contains_key("Parent"));
    }

    #[test]
    fn test_null_field_writes_no_key() {
        let raw = RawItem {
            fields: vec![
                RawField::new("Sprint", "iteration", serde_json::Value::Null),
                RawField::new("Notes", "text", json!("")),
            ],
            ..Default::default()
        };
        let item = normalize(&raw);
        assert!(!item.custom_fields.contains_key("Sprint"));
        assert_eq!(item.custom_fields.get("Notes"), Some(""));
    }

    #[test]
    fn test_later_duplicate_field_wins() {
        let raw = RawItem {
            fields: vec![
                RawField::new("Size", "text", json!("S")),
                RawField::new("Size", "text", json!("L")),
            ],
            ..Default::default()
        };
        assert_eq!(normalize(&raw).custom_fields.get("Size"), Some("L"));
    }

    #[test]
    fn test_graphql_shapes() {
        let raw = raw_item(json!({
            "id": "PVTI_gql",
            "type": "PULL_REQUEST",
            "content": {
                "__typename": "PullRequest",
                "number": 12,
                "title": "Add cache",
                "url": "https://github.com/acme/api/pull/12",
                "state": "OPEN",
                "repository": {"name": "api", "owner": {"login": "acme"}},
                "assignees": {"nodes": [{"login": "bob", "avatarUrl": ""}]},
                "labels": {"nodes": [{"name": "perf", "color": "00ff00"}]}
            },
            "fields": {"nodes": [
                {"name": "Status", "type": "ProjectV2ItemFieldSingleSelectValue", "value": {"name": "Review"}}
            ]}
        }));

        let item = normalize(&raw);
        assert_eq!(item.id, "PVTI_gql");
        assert_eq!(item.item_type, ItemType::PullRequest);
        assert_eq!(item.repository, "api");
        assert_eq!(item.repository_owner, "acme");
        assert_eq!(item.url, "https://github.com/acme/api/pull/12");
        assert_eq!(item.state, "OPEN");
        assert_eq!(item.status.as_deref(), Some("Review"));
    }

    #[test]
    fn test_merged_pull_request_state() {
        let raw = raw_item(json!({
            "content_type": "PullRequest",
            "content": {"state": "closed", "merged_at": "2024-02-01T00:00:00Z"}
        }));
        assert_eq!(normalize(&raw).state, "merged");

        let issue = raw_item(json!({
            "content_type": "Issue",
            "content": {"state": "closed", "merged_at": "2024-02-01T00:00:00Z"}
        }));
        assert_eq!(normalize(&issue).state, "closed");
    }

    #[test]
    fn test_content_milestone_fallback() {
        let raw = raw_item(json!({
            "content": {"title": "x", "milestone": {"title": "v2"}}
        }));
        assert_eq!(normalize(&raw).custom_fields.get("Milestone"), Some("v2"));

        let with_field = raw_item(json!({
            "content": {"title": "x", "milestone": {"title": "v2"}},
            "fields": [{"name": "Milestone", "data_type": "milestone", "value": {"title": "v3"}}]
        }));
        assert_eq!(normalize(&with_field).custom_fields.get("Milestone"), Some("v3"));
    }

    #[test]
    fn test_numeric_id_fallback() {
        let raw = raw_item(json!({"id": 987, "content": {"title": "t"}}));
        assert_eq!(normalize(&raw).id, "987");
    }

    #[test]
    fn test_normalize_all_skips_missing_content() {
        let raw = vec![
            raw_item(json!({"id": 1, "content": {"title": "kept"}})),
            raw_item(json!({"id": 2, "content": null})),
            raw_item(json!({"id": 3})),
        ];
        let items = normalize_all(&raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "kept");
    }

    #[test]
    fn test_parse_repository_url() {
        assert_eq!(
            parse_repository_url("https://api.github.com/repos/acme/web"),
            Some(("acme".to_string(), "web".to_string()))
        );
        assert_eq!(
            parse_repository_url("/repos/acme/web/issues/3"),
            Some(("acme".to_string(), "web".to_string()))
        );
        assert_eq!(parse_repository_url("https://api.github.com/repos/acme"), None);
        assert_eq!(parse_repository_url("not a url"), None);
    }
}
