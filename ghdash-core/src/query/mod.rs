//! Project filter language
//!
//! Filters look like the ones GitHub shows above a project view:
//! `status:"In Progress" -label:wontfix assignee:alice,bob is:open`.

mod matcher;
mod options;
mod parser;

pub use matcher::{filter_items, matches, matches_search};
pub use options::{filter_options, FilterOptions, ItemFilters};
pub use parser::{parse_filter, FilterClause, FilterSet};
