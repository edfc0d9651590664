//! Actions workflow status

use chrono::Utc;
use clap::Args;
use ghdash_core::dashboard::format_time_ago;
use ghdash_core::Config;

use super::{connect, print_json, repo_filter, truncate};

/// Arguments for the workflows command
#[derive(Args, Debug)]
pub struct WorkflowsArgs {
    /// Only this repository (owner/repo or URL)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Only runs on this branch
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Only show failing workflows
    #[arg(long)]
    pub failing: bool,
}

impl WorkflowsArgs {
    pub async fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let client = connect(config)?;
        let only = repo_filter(self.repo.as_deref())?;

        let mut statuses = client
            .list_workflow_statuses(only.as_deref())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if let Some(branch) = &self.branch {
            statuses.retain(|s| s.branch == *branch);
        }
        if self.failing {
            statuses.retain(|s| s.status == "failure");
        }

        if json {
            return print_json(&statuses);
        }

        if statuses.is_empty() {
            println!("No workflow runs found");
            return Ok(());
        }

        let now = Utc::now();
        for status in &statuses {
            println!(
                "{:<30} {:<25} {:<20} {:<12} {}",
                truncate(&status.repository, 30),
                truncate(&status.name, 25),
                truncate(&status.branch, 20),
                status.status,
                format_time_ago(&status.updated_at, now)
            );
        }

        Ok(())
    }
}
