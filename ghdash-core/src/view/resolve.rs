//! Field value resolution shared by grouping and sorting

use crate::project::NormalizedItem;

/// Group name used when no group-by field is set
pub const ALL_ITEMS: &str = "All Items";

/// Built-in field names offered for grouping
pub const BUILTIN_GROUP_FIELDS: &[&str] = &[
    "Assignees",
    "Labels",
    "Priority",
    "Repository",
    "State",
    "Status",
    "Type",
];

/// Value of `field` on `item`, as used for grouping and sorting
///
/// Resolution order: custom field (exact name, then ignoring case), built-in
/// attribute, then the `"No {Field}"` sentinel. A custom field holding an
/// empty string is returned as is, so such items form a `""` group of their
/// own rather than joining the sentinel group.
pub fn group_value(item: &NormalizedItem, field: &str) -> String {
    if let Some(value) = item.custom_fields.get_ignore_case(field) {
        return value.to_string();
    }

    let or_sentinel = |value: Option<&str>| match value.filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => missing_label(field),
    };

    match field.to_lowercase().as_str() {
        "status" => or_sentinel(item.status.as_deref()),
        "state" => or_sentinel(Some(&item.state)),
        "type" => item.item_type.as_str().to_string(),
        "repository" | "repo" => or_sentinel(Some(&item.repository)),
        "owner" | "repository_owner" => or_sentinel(Some(&item.repository_owner)),
        "assignee" | "assignees" => item
            .assignees
            .first()
            .map(|a| a.login.clone())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "Unassigned".to_string()),
        "priority" => or_sentinel(item.priority.as_deref()),
        "label" | "labels" => {
            or_sentinel(item.labels.first().map(|l| l.name.as_str()))
        }
        _ => missing_label(field),
    }
}

/// `"No {Field}"` with the field name title-cased
pub fn missing_label(field: &str) -> String {
    format!("No {}", title_case(field))
}

/// Whether a group name is a placeholder for a missing value
pub fn is_sentinel(name: &str) -> bool {
    name.starts_with("No ") || name == "Unassigned" || name == "Unknown"
}

/// `parentIssue`, `parent_issue` and `parent issue` all become `Parent Issue`
pub fn title_case(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in field.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Assignee, CustomFields, ItemType, Label};

    fn item() -> NormalizedItem {
        NormalizedItem {
            id: "1".to_string(),
            item_type: ItemType::PullRequest,
            number: Some(1),
            title: "t".to_string(),
            url: "#".to_string(),
            state: "open".to_string(),
            repository: "web".to_string(),
            repository_owner: "acme".to_string(),
            assignees: vec![],
            labels: vec![],
            created_at: String::new(),
            updated_at: String::new(),
            status: None,
            priority: None,
            custom_fields: CustomFields::new(),
        }
    }

    #[test]
    fn test_custom_field_lookup_order() {
        let mut it = item();
        it.custom_fields = [("Sprint", "Sprint 1"), ("size", "L")].into_iter().collect();
        assert_eq!(group_value(&it, "Sprint"), "Sprint 1");
        assert_eq!(group_value(&it, "sprint"), "Sprint 1");
        assert_eq!(group_value(&it, "Size"), "L");
    }

    #[test]
    fn test_empty_custom_value_is_kept() {
        let mut it = item();
        it.custom_fields = [("Sprint", "")].into_iter().collect();
        assert_eq!(group_value(&it, "Sprint"), "");
        assert_eq!(group_value(&it, "sprint"), "");
    }

    #[test]
    fn test_builtins() {
        let mut it = item();
        assert_eq!(group_value(&it, "type"), "PULL_REQUEST");
        assert_eq!(group_value(&it, "State"), "open");
        assert_eq!(group_value(&it, "repo"), "web");
        assert_eq!(group_value(&it, "Assignees"), "Unassigned");
        assert_eq!(group_value(&it, "Status"), "No Status");
        assert_eq!(group_value(&it, "Labels"), "No Labels");

        it.assignees.push(Assignee {
            login: "alice".to_string(),
            avatar_url: String::new(),
        });
        it.labels.push(Label {
            name: "bug".to_string(),
            color: String::new(),
        });
        it.priority = Some("P0".to_string());
        assert_eq!(group_value(&it, "assignee"), "alice");
        assert_eq!(group_value(&it, "label"), "bug");
        assert_eq!(group_value(&it, "priority"), "P0");
    }

    #[test]
    fn test_unknown_field_sentinel() {
        assert_eq!(group_value(&item(), "iterationName"), "No Iteration Name");
        assert_eq!(group_value(&item(), "parent_issue"), "No Parent Issue");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("status"), "Status");
        assert_eq!(title_case("parentIssue"), "Parent Issue");
        assert_eq!(title_case("linked-pull_requests"), "Linked Pull Requests");
        assert_eq!(title_case("Parent issue"), "Parent Issue");
        assert_eq!(title_case("ID"), "ID");
    }

    #[test]
    fn test_is_sentinel() {
        assert!(is_sentinel("No Status"));
        assert!(is_sentinel("Unassigned"));
        assert!(is_sentinel("Unknown"));
        assert!(!is_sentinel("Nothing"));
        assert!(!is_sentinel("Done"));
    }
}
