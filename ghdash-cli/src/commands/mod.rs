//! Command implementations for the ghdash CLI

pub mod projects;
pub mod prs;
pub mod repos;
pub mod view;
pub mod workflows;

pub use projects::FieldsArgs;
pub use prs::PrsArgs;
pub use repos::ReposArgs;
pub use view::ViewArgs;
pub use workflows::WorkflowsArgs;

use ghdash_core::Config;
use ghdash_github::{parse_github_url, GitHubClient};
use serde::Serialize;

/// Build a GitHub client from config and the stored token
pub(crate) fn connect(config: &Config) -> anyhow::Result<GitHubClient> {
    GitHubClient::new(config).map_err(|e| anyhow::anyhow!("{}", e))
}

/// Normalize a `--repo` argument to `owner/name`
pub(crate) fn repo_filter(repo: Option<&str>) -> anyhow::Result<Option<String>> {
    repo.map(|r| {
        parse_github_url(r)
            .map(|(owner, name)| format!("{}/{}", owner, name))
            .map_err(|e| anyhow::anyhow!("{}", e))
    })
    .transpose()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Cut `s` to at most `max` characters, marking the cut with `...`
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
