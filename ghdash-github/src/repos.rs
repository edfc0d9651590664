//! Repository listing

use crate::{Error, GitHubClient, Result};
use ghdash_core::dashboard::Repository;
use octocrab::Page;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct ReposQuery {
    #[serde(rename = "type")]
    kind: &'static str,
    sort: &'static str,
    per_page: u8,
}

impl GitHubClient {
    /// All repositories of the owner, archived ones included
    ///
    /// Tries the organization endpoint first and falls back to the user
    /// endpoint when the owner is not an organization.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let query = ReposQuery {
            kind: "all",
            sort: "updated",
            per_page: self.fetch_config().page_size,
        };

        let org_route = format!("/orgs/{}/repos", self.owner());
        let first: Page<Repository> = match self.client().get(&org_route, Some(&query)).await {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    owner = %self.owner(),
                    error = %e,
                    "Organization endpoint failed, trying user endpoint"
                );
                let user_route = format!("/users/{}/repos", self.owner());
                self.client()
                    .get(&user_route, Some(&query))
                    .await
                    .map_err(Error::from_api)?
            }
        };

        let repos = self
            .client()
            .all_pages(first)
            .await
            .map_err(Error::from_api)?;

        info!(owner = %self.owner(), count = repos.len(), "Fetched repositories");
        Ok(repos)
    }

    /// Non-archived repositories, optionally narrowed to one `owner/name`
    pub(crate) async fn active_repositories(&self, only: Option<&str>) -> Result<Vec<Repository>> {
        let repos: Vec<Repository> = self
            .list_repositories()
            .await?
            .into_iter()
            .filter(|r| !r.archived)
            .filter(|r| match only {
                Some(full) => r.full_name.eq_ignore_ascii_case(full),
                None => true,
            })
            .collect();

        debug!(count = repos.len(), "Active repositories");
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repos_query_serialization() {
        let query = ReposQuery {
            kind: "all",
            sort: "updated",
            per_page: 100,
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"type": "all", "sort": "updated", "per_page": 100})
        );
    }

    #[test]
    fn test_repository_from_rest_payload() {
        let repo: Repository = serde_json::from_value(json!({
            "id": 1,
            "name": "web",
            "full_name": "acme/web",
            "description": null,
            "private": true,
            "archived": false,
            "language": "TypeScript",
            "stargazers_count": 3,
            "forks_count": 1,
            "open_issues_count": 2,
            "topics": ["vue"],
            "default_branch": "main",
            "owner": {"login": "acme"},
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(repo.full_name, "acme/web");
        assert!(repo.private);
        assert!(repo.description.is_none());
        assert_eq!(repo.size, 0);
    }
}
