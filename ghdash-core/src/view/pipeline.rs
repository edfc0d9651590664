//! Saved view rendering: filter, group, sort

use tracing::debug;

use super::group::{group_items, GroupedItems};
use super::sort::sort_items_in_groups;
use crate::project::{FieldConfig, NormalizedItem, ProjectView};
use crate::query::filter_items;

/// Filter, group and sort `items` the way `view` is configured
///
/// The group-by field's schema entry (matched ignoring case) supplies option
/// order and colors.
pub fn apply_view(
    items: &[NormalizedItem],
    view: &ProjectView,
    fields: &[FieldConfig],
) -> Vec<GroupedItems> {
    let filtered = filter_items(items, view.filter.as_deref());
    let group_field = view.group_field();
    let config = group_field.and_then(|name| FieldConfig::lookup(fields, name));

    let groups = group_items(&filtered, group_field, config);
    let sorted = sort_items_in_groups(&groups, &view.sort_by_fields);

    debug!(
        view = %view.name,
        items = items.len(),
        filtered = filtered.len(),
        groups = sorted.len(),
        "Applied project view"
    );

    sorted
}
