//! Grouping and sorting of normalized items

mod group;
mod pipeline;
pub mod resolve;
mod sort;

pub use group::{available_group_fields, group_items, GroupedItems};
pub use pipeline::apply_view;
pub use resolve::group_value;
pub use sort::{parse_timestamp, sort_items, sort_items_in_groups};
