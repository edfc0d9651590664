//! Pull request overview

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::project::{Assignee, Label};

/// Pull request across the owner's repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub id: u64,
    pub number: u64,
    pub title: String,
    /// `open` or `closed` as reported by the API
    pub state: String,
    pub html_url: String,
    pub draft: bool,
    pub author: Option<String>,
    pub assignees: Vec<Assignee>,
    pub labels: Vec<Label>,
    pub head_ref: String,
    pub base_ref: String,
    /// Repository name
    pub repository: String,
    pub repository_full_name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullRequestState {
    Merged,
    Draft,
    Open,
    Closed,
}

impl std::fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PullRequestState::Merged => write!(f, "Merged"),
            PullRequestState::Draft => write!(f, "Draft"),
            PullRequestState::Open => write!(f, "Open"),
            PullRequestState::Closed => write!(f, "Closed"),
        }
    }
}

impl PullRequestSummary {
    /// Merged wins over everything, then open drafts
    pub fn display_state(&self) -> PullRequestState {
        let open = self.state.eq_ignore_ascii_case("open");
        if self.merged_at.is_some() {
            PullRequestState::Merged
        } else if open && self.draft {
            PullRequestState::Draft
        } else if open {
            PullRequestState::Open
        } else {
            PullRequestState::Closed
        }
    }
}

/// Counts shown above the pull request list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestStats {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub merged: usize,
    pub draft: usize,
    /// Distinct repositories with at least one pull request
    pub repositories: usize,
}

impl PullRequestStats {
    pub fn from_pulls(pulls: &[PullRequestSummary]) -> Self {
        let repositories: BTreeSet<&str> = pulls.iter().map(|p| p.repository.as_str()).collect();
        Self {
            total: pulls.len(),
            open: pulls.iter().filter(|p| p.state == "open").count(),
            closed: pulls.iter().filter(|p| p.state == "closed").count(),
            merged: pulls.iter().filter(|p| p.merged_at.is_some()).count(),
            draft: pulls.iter().filter(|p| p.draft).count(),
            repositories: repositories.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull(repo: &str, state: &str, draft: bool, merged: bool) -> PullRequestSummary {
        PullRequestSummary {
            id: 1,
            number: 1,
            title: "t".to_string(),
            state: state.to_string(),
            html_url: String::new(),
            draft,
            author: Some("alice".to_string()),
            assignees: vec![],
            labels: vec![],
            head_ref: "feature".to_string(),
            base_ref: "main".to_string(),
            repository: repo.to_string(),
            repository_full_name: format!("acme/{}", repo),
            created_at: None,
            updated_at: None,
            closed_at: None,
            merged_at: merged.then(|| "2024-01-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_display_state() {
        assert_eq!(pull("a", "open", false, false).display_state(), PullRequestState::Open);
        assert_eq!(pull("a", "open", true, false).display_state(), PullRequestState::Draft);
        assert_eq!(pull("a", "closed", true, false).display_state(), PullRequestState::Closed);
        assert_eq!(pull("a", "closed", false, true).display_state(), PullRequestState::Merged);
        assert_eq!(PullRequestState::Merged.to_string(), "Merged");
    }

    #[test]
    fn test_stats() {
        let pulls = vec![
            pull("web", "open", false, false),
            pull("web", "open", true, false),
            pull("api", "closed", false, true),
            pull("api", "closed", false, false),
        ];
        let stats = PullRequestStats::from_pulls(&pulls);
        assert_eq!(
            stats,
            PullRequestStats {
                total: 4,
                open: 2,
                closed: 2,
                merged: 1,
                draft: 1,
                repositories: 2,
            }
        );
        assert_eq!(PullRequestStats::from_pulls(&[]), PullRequestStats::default());
    }
}
