//! GitHub Actions workflow status across repositories

use crate::batch::run_batched;
use crate::{Error, GitHubClient, Result};
use futures::future::join_all;
use ghdash_core::dashboard::{
    latest_runs_by_branch, Repository, RepositoryRef, Workflow, WorkflowRun, WorkflowStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Runs inspected per workflow when looking for the latest run of each branch
const RUNS_PER_WORKFLOW: u8 = 10;

#[derive(Debug, Deserialize)]
struct WorkflowList {
    #[serde(default)]
    workflows: Vec<Workflow>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunList {
    #[serde(default)]
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Serialize)]
struct RunsQuery {
    per_page: u8,
}

impl GitHubClient {
    /// Latest run per branch for every workflow of one repository
    pub async fn list_repository_workflows(
        &self,
        repo: &Repository,
    ) -> Result<Vec<WorkflowStatus>> {
        let route = format!("/repos/{}/actions/workflows", repo.full_name);
        let list: WorkflowList = self
            .client()
            .get(&route, None::<&()>)
            .await
            .map_err(Error::from_api)?;

        if list.workflows.is_empty() {
            debug!(repo = %repo.full_name, "No workflows");
            return Ok(Vec::new());
        }

        let target = RepositoryRef {
            name: &repo.name,
            full_name: &repo.full_name,
            private: repo.private,
        };

        let fetches = list.workflows.iter().map(|w| self.workflow_runs(repo, w));
        let runs = join_all(fetches).await;

        let mut statuses = Vec::new();
        for (workflow, runs) in list.workflows.iter().zip(runs) {
            match runs {
                Ok(runs) => statuses.extend(latest_runs_by_branch(target, workflow, &runs)),
                Err(e) => warn!(
                    repo = %repo.full_name,
                    workflow = %workflow.name,
                    error = %e,
                    "Failed to fetch workflow runs"
                ),
            }
        }

        debug!(repo = %repo.full_name, count = statuses.len(), "Fetched workflow statuses");
        Ok(statuses)
    }

    async fn workflow_runs(
        &self,
        repo: &Repository,
        workflow: &Workflow,
    ) -> Result<Vec<WorkflowRun>> {
        let route = format!(
            "/repos/{}/actions/workflows/{}/runs",
            repo.full_name, workflow.id
        );
        let list: WorkflowRunList = self
            .client()
            .get(
                &route,
                Some(&RunsQuery {
                    per_page: RUNS_PER_WORKFLOW,
                }),
            )
            .await
            .map_err(Error::from_api)?;
        Ok(list.workflow_runs)
    }

    /// Workflow statuses of every active repository, most recent first
    pub async fn list_workflow_statuses(&self, only: Option<&str>) -> Result<Vec<WorkflowStatus>> {
        let repos = self.active_repositories(only).await?;
        let fetch = self.fetch_config();

        let mut statuses = run_batched(
            repos.iter().collect::<Vec<_>>(),
            fetch.batch_size,
            fetch.batch_delay,
            |repo| self.list_repository_workflows(*repo),
        )
        .await;

        statuses.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        info!(
            repositories = repos.len(),
            count = statuses.len(),
            "Fetched workflow statuses"
        );
        Ok(statuses)
    }
}
