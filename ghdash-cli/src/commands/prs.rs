//! Pull request dashboard

use chrono::Utc;
use clap::{Args, ValueEnum};
use ghdash_core::dashboard::{format_time_ago, PullRequestStats, PullRequestSummary};
use ghdash_core::Config;
use ghdash_github::PullState;
use serde::Serialize;

use super::{connect, print_json, repo_filter, truncate};

/// State filter for pull requests
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl From<StateFilter> for PullState {
    fn from(s: StateFilter) -> Self {
        match s {
            StateFilter::Open => PullState::Open,
            StateFilter::Closed => PullState::Closed,
            StateFilter::All => PullState::All,
        }
    }
}

/// Arguments for the prs command
#[derive(Args, Debug)]
pub struct PrsArgs {
    /// Filter by state
    #[arg(short, long, value_enum, default_value = "open")]
    pub state: StateFilter,

    /// Only this repository (owner/repo or URL)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Only pull requests authored by this login
    #[arg(long)]
    pub author: Option<String>,

    /// Maximum number of pull requests to show
    #[arg(short, long, default_value = "50")]
    pub limit: usize,
}

#[derive(Serialize)]
struct PrsReport<'a> {
    stats: PullRequestStats,
    pull_requests: &'a [PullRequestSummary],
}

impl PrsArgs {
    pub async fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let client = connect(config)?;
        let only = repo_filter(self.repo.as_deref())?;

        let mut pulls = client
            .list_pull_requests(self.state.into(), only.as_deref())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if let Some(author) = &self.author {
            pulls.retain(|pr| {
                pr.author
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(author))
            });
        }

        let stats = PullRequestStats::from_pulls(&pulls);
        pulls.truncate(self.limit);

        if json {
            return print_json(&PrsReport {
                stats,
                pull_requests: &pulls,
            });
        }

        println!(
            "{} pull request(s) across {} repositories: {} open, {} draft, {} merged, {} closed",
            stats.total, stats.repositories, stats.open, stats.draft, stats.merged, stats.closed
        );
        println!();

        if pulls.is_empty() {
            println!("No pull requests found");
            return Ok(());
        }

        let now = Utc::now();
        for pr in &pulls {
            let updated = pr
                .updated_at
                .as_deref()
                .map(|t| format_time_ago(t, now))
                .unwrap_or_default();
            println!(
                "{:<30} #{:<6} {:<7} {:<50} {:<15} {}",
                truncate(&pr.repository_full_name, 30),
                pr.number,
                pr.display_state().to_string(),
                truncate(&pr.title, 50),
                truncate(pr.author.as_deref().unwrap_or("-"), 15),
                updated
            );
        }

        Ok(())
    }
}
