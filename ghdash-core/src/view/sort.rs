//! Sort engine

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use super::group::GroupedItems;
use super::resolve::group_value;
use crate::project::{NormalizedItem, SortDirection, SortSpec};

/// Sorted copy of `items`
///
/// Keys are compared case-insensitively in spec order; remaining ties (and
/// the no-spec case) fall back to most recently updated first. The sort is
/// stable.
pub fn sort_items(items: &[NormalizedItem], specs: &[SortSpec]) -> Vec<NormalizedItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare_items(a, b, specs));
    sorted
}

/// Sort the items of every group, keeping group order
pub fn sort_items_in_groups(groups: &[GroupedItems], specs: &[SortSpec]) -> Vec<GroupedItems> {
    groups
        .iter()
        .map(|group| GroupedItems {
            items: sort_items(&group.items, specs),
            ..group.clone()
        })
        .collect()
}

fn compare_items(a: &NormalizedItem, b: &NormalizedItem, specs: &[SortSpec]) -> Ordering {
    for spec in specs {
        let left = group_value(a, &spec.field_name).to_lowercase();
        let right = group_value(b, &spec.field_name).to_lowercase();
        let ordering = match spec.direction {
            SortDirection::Asc => left.cmp(&right),
            SortDirection::Desc => right.cmp(&left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    newest_first(&a.updated_at, &b.updated_at)
}

/// Descending by timestamp; unparseable values after parseable ones
fn newest_first(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
