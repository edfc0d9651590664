//! GitHub Projects V2 data model
//!
//! Raw items as returned by the REST API ([`RawItem`]), the polymorphic
//! field values they carry ([`FieldValue`]), the flat record the rest of the
//! crate works with ([`NormalizedItem`]) and view/field configuration.

mod field;
mod item;
mod normalize;
mod raw;
mod view;

pub use field::{FieldKind, FieldValue, IssueReference};
pub use item::{Assignee, CustomFields, ItemType, Label, NormalizedItem, PARENT_ISSUE_FIELD};
pub use normalize::{normalize, normalize_all, parse_repository_url};
pub use raw::{RawContent, RawField, RawItem, RawLabel, RawMilestone, RawRepository, RawUser};
pub use view::{FieldConfig, FieldOption, ProjectView, SortDirection, SortSpec, ViewLayout};

/// Fold a type tag for comparison: lowercase, separators removed.
///
/// `single_select`, `SINGLE_SELECT` and `SingleSelect` all fold to
/// `singleselect`.
pub(crate) fn fold_tag(tag: &str) -> String {
    tag.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
