//! Pull requests across all repositories of the owner

use std::str::FromStr;

use crate::batch::run_batched;
use crate::{Error, GitHubClient, Result};
use chrono::SecondsFormat;
use ghdash_core::dashboard::{PullRequestSummary, Repository};
use ghdash_core::{Assignee, Label};
use octocrab::models::pulls::PullRequest as OctocrabPR;
use octocrab::params::{self, pulls::Sort, Direction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// State filter for pull request listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullState {
    #[default]
    Open,
    Closed,
    All,
}

impl FromStr for PullState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PullState::Open),
            "closed" => Ok(PullState::Closed),
            "all" => Ok(PullState::All),
            other => Err(Error::Parse(format!(
                "Invalid pull request state: {}. Expected open, closed or all",
                other
            ))),
        }
    }
}

impl From<PullState> for params::State {
    fn from(state: PullState) -> Self {
        match state {
            PullState::Open => params::State::Open,
            PullState::Closed => params::State::Closed,
            PullState::All => params::State::All,
        }
    }
}

fn timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> Option<String> {
    value.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn summarize(pr: OctocrabPR, repo: &Repository) -> PullRequestSummary {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Closed) => "closed",
        _ => "open",
    };

    PullRequestSummary {
        id: pr.id.0,
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        state: state.to_string(),
        html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
        draft: pr.draft.unwrap_or(false),
        author: pr.user.map(|u| u.login),
        assignees: pr
            .assignees
            .unwrap_or_default()
            .into_iter()
            .map(|a| Assignee {
                login: a.login,
                avatar_url: a.avatar_url.to_string(),
            })
            .collect(),
        labels: pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| Label {
                name: l.name,
                color: l.color,
            })
            .collect(),
        head_ref: pr.head.ref_field,
        base_ref: pr.base.ref_field,
        repository: repo.name.clone(),
        repository_full_name: repo.full_name.clone(),
        created_at: timestamp(pr.created_at),
        updated_at: timestamp(pr.updated_at),
        closed_at: timestamp(pr.closed_at),
        merged_at: timestamp(pr.merged_at),
    }
}

impl GitHubClient {
    /// Most recently updated pull requests of one repository
    pub async fn list_repository_pulls(
        &self,
        repo: &Repository,
        state: PullState,
    ) -> Result<Vec<PullRequestSummary>> {
        let (owner, name) = repo
            .full_name
            .split_once('/')
            .ok_or_else(|| Error::Parse(format!("Invalid repository name: {}", repo.full_name)))?;

        debug!(repo = %repo.full_name, ?state, "Fetching pull requests");

        let page = self
            .client()
            .pulls(owner, name)
            .list()
            .state(state.into())
            .sort(Sort::Updated)
            .direction(Direction::Descending)
            .per_page(self.fetch_config().page_size)
            .send()
            .await
            .map_err(Error::from_api)?;

        Ok(page
            .items
            .into_iter()
            .map(|pr| summarize(pr, repo))
            .collect())
    }

    /// Pull requests of every active repository, newest activity first
    ///
    /// Repositories are queried in batches; a repository that fails is
    /// skipped.
    pub async fn list_pull_requests(
        &self,
        state: PullState,
        only: Option<&str>,
    ) -> Result<Vec<PullRequestSummary>> {
        let repos = self.active_repositories(only).await?;
        let fetch = self.fetch_config();

        let mut pulls = run_batched(
            repos.iter().collect::<Vec<_>>(),
            fetch.batch_size,
            fetch.batch_delay,
            |repo| self.list_repository_pulls(*repo, state),
        )
        .await;

        pulls.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        info!(
            repositories = repos.len(),
            count = pulls.len(),
            "Fetched pull requests"
        );
        Ok(pulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_state_from_str() {
        assert_eq!("open".parse::<PullState>().unwrap(), PullState::Open);
        assert_eq!("CLOSED".parse::<PullState>().unwrap(), PullState::Closed);
        assert_eq!("all".parse::<PullState>().unwrap(), PullState::All);
        assert!("merged".parse::<PullState>().is_err());
    }

    #[test]
    fn test_timestamp_format() {
        use chrono::TimeZone;
        let t = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(timestamp(Some(t)).as_deref(), Some("2024-03-01T08:30:00Z"));
        assert_eq!(timestamp(None), None);
    }
}
