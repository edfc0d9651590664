//! Structured table filters
//!
//! The dropdown-style counterpart of the filter language: each attribute is
//! either unset (show all) or an exact value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::matcher::matches_search;
use crate::project::{ItemType, NormalizedItem};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFilters {
    pub search: Option<String>,
    pub state: Option<String>,
    pub item_type: Option<ItemType>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    /// `owner/name`
    pub repository: Option<String>,
}

impl ItemFilters {
    pub fn matches(&self, item: &NormalizedItem) -> bool {
        if let Some(search) = &self.search {
            if !matches_search(item, search) {
                return false;
            }
        }
        if self.state.as_ref().is_some_and(|s| *s != item.state) {
            return false;
        }
        if self.item_type.is_some_and(|t| t != item.item_type) {
            return false;
        }
        if self
            .status
            .as_ref()
            .is_some_and(|s| item.status.as_ref() != Some(s))
        {
            return false;
        }
        if self
            .repository
            .as_ref()
            .is_some_and(|r| *r != format!("{}/{}", item.repository_owner, item.repository))
        {
            return false;
        }
        if let Some(login) = &self.assignee {
            if !item.assignees.iter().any(|a| a.login == *login) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, items: &[NormalizedItem]) -> Vec<NormalizedItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Distinct values offered by each filter dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub statuses: Vec<String>,
    pub repositories: Vec<String>,
    pub assignees: Vec<String>,
}

/// Collect the distinct states, statuses, repositories and assignees
pub fn filter_options(items: &[NormalizedItem]) -> FilterOptions {
    let mut states = BTreeSet::new();
    let mut statuses = BTreeSet::new();
    let mut repositories = BTreeSet::new();
    let mut assignees = BTreeSet::new();

    for item in items {
        states.insert(item.state.clone());
        if let Some(status) = item.status.as_ref().filter(|s| !s.is_empty()) {
            statuses.insert(status.clone());
        }
        repositories.insert(format!("{}/{}", item.repository_owner, item.repository));
        assignees.extend(item.assignees.iter().map(|a| a.login.clone()));
    }

    FilterOptions {
        states: states.into_iter().collect(),
        statuses: statuses.into_iter().collect(),
        repositories: repositories.into_iter().collect(),
        assignees: assignees.into_iter().collect(),
    }
}
