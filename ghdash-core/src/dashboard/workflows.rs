//! GitHub Actions overview

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::view::parse_timestamp;

/// Workflow definition from `GET /repos/{repo}/actions/workflows`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub state: Option<String>,
    pub html_url: String,
    pub updated_at: String,
}

/// Run from `GET /repos/{repo}/actions/workflows/{id}/runs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowRun {
    pub id: u64,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
    pub updated_at: String,
    pub html_url: String,
    pub run_number: u64,
    pub event: String,
}

/// Latest run of one workflow on one branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    /// `{repo}-{workflow id}-{branch}`
    pub id: String,
    pub workflow_id: u64,
    pub name: String,
    pub repository: String,
    pub branch: String,
    pub state: String,
    /// Run conclusion, else run status, else workflow state
    pub status: String,
    pub updated_at: String,
    pub html_url: String,
    pub workflow_url: String,
    pub badge_url: String,
    pub run_number: u64,
    pub event: String,
    pub is_private: bool,
}

/// Repository context for [`latest_runs_by_branch`]
#[derive(Debug, Clone, Copy)]
pub struct RepositoryRef<'a> {
    pub name: &'a str,
    pub full_name: &'a str,
    pub private: bool,
}

/// One status per branch, taken from that branch's most recently updated run
///
/// Runs without a head branch are ignored. Output is ordered by branch name.
pub fn latest_runs_by_branch(
    repo: RepositoryRef<'_>,
    workflow: &Workflow,
    runs: &[WorkflowRun],
) -> Vec<WorkflowStatus> {
    let mut latest: BTreeMap<&str, &WorkflowRun> = BTreeMap::new();
    for run in runs {
        let Some(branch) = run.head_branch.as_deref().filter(|b| !b.is_empty()) else {
            continue;
        };
        let newer = match latest.get(branch) {
            Some(current) => {
                parse_timestamp(&run.updated_at) > parse_timestamp(&current.updated_at)
            }
            None => true,
        };
        if newer {
            latest.insert(branch, run);
        }
    }

    let state = workflow
        .state
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    latest
        .into_iter()
        .map(|(branch, run)| WorkflowStatus {
            id: format!("{}-{}-{}", repo.name, workflow.id, branch),
            workflow_id: workflow.id,
            name: workflow.name.clone(),
            repository: repo.name.to_string(),
            branch: branch.to_string(),
            state: state.clone(),
            status: run
                .conclusion
                .clone()
                .or_else(|| run.status.clone())
                .or_else(|| workflow.state.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            updated_at: run.updated_at.clone(),
            html_url: run.html_url.clone(),
            workflow_url: workflow.html_url.clone(),
            badge_url: badge_url(repo.full_name, &workflow.path, branch),
            run_number: run.run_number,
            event: run.event.clone(),
            is_private: repo.private,
        })
        .collect()
}

/// Status badge for a workflow file on a branch
pub fn badge_url(full_name: &str, workflow_path: &str, branch: &str) -> String {
    let file = workflow_path
        .strip_prefix(".github/workflows/")
        .unwrap_or(workflow_path);
    format!(
        "https://github.com/{}/actions/workflows/{}/badge.svg?branch={}",
        full_name, file, branch
    )
}
