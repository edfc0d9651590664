//! Grouping engine

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolve::{group_value, is_sentinel, ALL_ITEMS, BUILTIN_GROUP_FIELDS};
use crate::project::{FieldConfig, NormalizedItem};

/// One bucket of a grouped view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedItems {
    pub name: String,
    pub items: Vec<NormalizedItem>,
    pub count: usize,
    /// Color of the matching single-select option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Position of the matching option in the field schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

impl GroupedItems {
    pub fn new(name: impl Into<String>, items: Vec<NormalizedItem>) -> Self {
        Self {
            name: name.into(),
            count: items.len(),
            items,
            color: None,
            order: None,
        }
    }
}

/// Bucket items by the value of `field`
///
/// Without a field every item lands in a single `"All Items"` group. Group
/// order: configured options in schema order, then other values
/// alphabetically (ignoring case), then sentinel groups such as
/// `"No Status"` or `"Unassigned"`.
pub fn group_items(
    items: &[NormalizedItem],
    field: Option<&str>,
    config: Option<&FieldConfig>,
) -> Vec<GroupedItems> {
    let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) else {
        return vec![GroupedItems::new(ALL_ITEMS, items.to_vec())];
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupedItems> = Vec::new();
    for item in items {
        let name = group_value(item, field);
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            groups.push(GroupedItems::new(name, Vec::new()));
            groups.len() - 1
        });
        groups[slot].items.push(item.clone());
    }

    for group in &mut groups {
        group.count = group.items.len();
        if let Some((order, option)) = config.and_then(|c| c.find_option(&group.name)) {
            group.order = Some(order);
            group.color = option.color.clone();
        }
    }

    groups.sort_by(compare_groups);

    debug!(field, groups = groups.len(), items = items.len(), "Grouped items");

    groups
}

fn rank(group: &GroupedItems) -> u8 {
    if group.order.is_some() {
        0
    } else if is_sentinel(&group.name) {
        2
    } else {
        1
    }
}

fn compare_groups(a: &GroupedItems, b: &GroupedItems) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    })
}

/// Built-in field names plus every custom field present on any item
pub fn available_group_fields(items: &[NormalizedItem]) -> Vec<String> {
    let mut fields: BTreeSet<String> = BUILTIN_GROUP_FIELDS
        .iter()
        .map(|f| f.to_string())
        .collect();
    for item in items {
        fields.extend(item.custom_fields.keys().map(str::to_string));
    }
    fields.into_iter().collect()
}
