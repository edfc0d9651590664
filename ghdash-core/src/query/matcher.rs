//! Evaluate filters against normalized items

use tracing::debug;

use super::parser::{parse_filter, FilterClause, FilterSet};
use crate::project::{ItemType, NormalizedItem};

/// Whether `item` satisfies every clause of `filters`
///
/// Clauses are ANDed; the values of one clause are ORed. A negated clause
/// rejects the item when any of its values matches.
pub fn matches(item: &NormalizedItem, filters: &FilterSet) -> bool {
    filters.clauses().iter().all(|clause| {
        let hit = clause_hits(item, clause);
        hit != clause.negated
    })
}

/// Free-text search over the visible attributes of an item
pub fn matches_search(item: &NormalizedItem, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let folded = term.to_lowercase();
    let contains = |s: &str| s.to_lowercase().contains(&folded);

    contains(&item.title)
        || contains(&item.repository)
        || contains(&item.repository_owner)
        || item.assignees.iter().any(|a| contains(&a.login))
        || item.labels.iter().any(|l| contains(&l.name))
        || item.custom_fields.values().any(contains)
        || item.number.is_some_and(|n| n.to_string().contains(term))
}

/// Items matching a filter string; no filter keeps everything
pub fn filter_items(items: &[NormalizedItem], filter: Option<&str>) -> Vec<NormalizedItem> {
    let filters = match filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(filter) => parse_filter(filter),
        None => return items.to_vec(),
    };
    if filters.is_empty() {
        return items.to_vec();
    }

    let kept: Vec<NormalizedItem> = items
        .iter()
        .filter(|item| matches(item, &filters))
        .cloned()
        .collect();

    debug!(
        total = items.len(),
        kept = kept.len(),
        clauses = filters.len(),
        "Applied filter"
    );

    kept
}

fn clause_hits(item: &NormalizedItem, clause: &FilterClause) -> bool {
    let any_in = |candidates: &[String]| clause.values.iter().any(|v| candidates.contains(v));

    match clause.field.as_str() {
        "is" => any_in(&is_values(item)),
        "assignee" => any_in(
            &item
                .assignees
                .iter()
                .map(|a| a.login.to_lowercase())
                .collect::<Vec<_>>(),
        ),
        "label" => any_in(
            &item
                .labels
                .iter()
                .map(|l| l.name.to_lowercase())
                .collect::<Vec<_>>(),
        ),
        "repo" | "repository" => any_in(&[
            item.repository.to_lowercase(),
            format!("{}/{}", item.repository_owner, item.repository).to_lowercase(),
        ]),
        "state" => any_in(&[item.state.to_lowercase()]),
        "parent-issue" => match item.parent_issue() {
            Some(parent) => clause.values.iter().any(|v| parent_matches(parent, v)),
            None => false,
        },
        field => match item.custom_fields.get_ignore_case(field) {
            Some(value) => any_in(&[value.to_lowercase()]),
            None => false,
        },
    }
}

/// Values an item answers to under `is:`
fn is_values(item: &NormalizedItem) -> Vec<String> {
    let state = item.state.to_lowercase();
    let mut values = vec![state.clone()];
    if state == "merged" {
        values.push("closed".to_string());
    }
    values.push(
        match item.item_type {
            ItemType::Issue => "issue",
            ItemType::PullRequest => "pr",
            ItemType::DraftIssue => "draft",
        }
        .to_string(),
    );
    values
}

/// `(repository, number)` out of `acme/web#12 Title` or `#12`
fn split_reference(text: &str) -> Option<(Option<&str>, u64)> {
    let head = text.split_whitespace().next()?;
    let (repo, number) = head.split_once('#')?;
    let number = number.parse().ok()?;
    let repo = Some(repo).filter(|r| !r.is_empty());
    Some((repo, number))
}

fn parent_matches(parent: &str, value: &str) -> bool {
    let parent = parent.to_lowercase();
    match (split_reference(value), split_reference(&parent)) {
        (Some((want_repo, want_number)), Some((have_repo, have_number))) => {
            want_number == have_number
                && match (want_repo, have_repo) {
                    (Some(want), Some(have)) => want == have,
                    _ => true,
                }
        }
        (Some(_), None) => false,
        (None, _) => parent == value,
    }
}
