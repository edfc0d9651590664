//! ghdash core - data model and view engine for the ghdash GitHub dashboard
//!
//! This crate turns raw GitHub Projects V2 items into flat records and
//! provides the filter language, grouping and sorting used to render project
//! views. Everything here is synchronous and free of I/O apart from loading
//! configuration and secrets.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod project;
pub mod query;
pub mod secrets;
pub mod view;

pub use config::{Config, FetchConfig, GitHubConfig};
pub use error::{Error, Result};
pub use project::{
    normalize, normalize_all, Assignee, CustomFields, FieldConfig, FieldKind, FieldOption,
    FieldValue, ItemType, Label, NormalizedItem, ProjectView, RawContent, RawField, RawItem,
    SortDirection, SortSpec, ViewLayout,
};
pub use query::{
    filter_items, filter_options, matches, matches_search, parse_filter, FilterClause, FilterSet,
    ItemFilters,
};
pub use secrets::{ResolvedToken, Secrets, TokenKind, TokenSource};
pub use view::{
    apply_view, available_group_fields, group_items, sort_items, sort_items_in_groups,
    GroupedItems,
};
