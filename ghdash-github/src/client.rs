//! GitHub API client using octocrab

use crate::{Error, Result};
use ghdash_core::{Config, FetchConfig, Secrets};
use octocrab::Octocrab;
use tracing::{debug, info};

/// GitHub API client scoped to one organization or user
pub struct GitHubClient {
    client: Octocrab,
    http: reqwest::Client,
    token: String,
    owner: String,
    fetch: FetchConfig,
}

impl GitHubClient {
    /// Create a client for the owner named in `config`
    ///
    /// The token comes from `GHDASH_TOKEN`, `GITHUB_TOKEN` or `GH_TOKEN`, else
    /// from `~/.config/ghdash/secrets.toml`.
    pub fn new(config: &Config) -> Result<Self> {
        let secrets = Secrets::load().map_err(|e| Error::Auth(e.to_string()))?;

        let token = secrets.resolve_token().ok_or_else(|| {
            Error::Auth(
                "GitHub token not found. Set GITHUB_TOKEN or run \
                 `ghdash config --init-secrets` and add a token"
                    .to_string(),
            )
        })?;
        debug!(source = %token.source, kind = %token.kind(), "Resolved GitHub token");

        Self::with_token(config, token.value)
    }

    /// Create a client with an explicit token
    pub fn with_token(config: &Config, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let owner = config.github.owner.clone();

        let client = Octocrab::builder()
            .personal_token(token.clone())
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("ghdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(owner = %owner, "Created GitHub client");

        Ok(Self {
            client,
            http,
            token,
            owner,
            fetch: config.fetch.clone(),
        })
    }

    /// Organization or user the dashboard reads from
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Batch and paging settings
    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Check the token by fetching the authenticated user
    pub async fn test_connection(&self) -> Result<String> {
        debug!("Testing GitHub connection");

        let user = self
            .client
            .current()
            .user()
            .await
            .map_err(Error::from_api)?;

        info!(login = %user.login, "GitHub connection successful");
        Ok(user.login)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .field("fetch", &self.fetch)
            .finish_non_exhaustive()
    }
}

/// Parse a repository reference into owner and repo
///
/// Supports formats:
/// - owner/repo
/// - https://github.com/owner/repo
/// - git@github.com:owner/repo.git
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    let invalid = || {
        Error::Parse(format!(
            "Invalid repository format: {}. Expected owner/repo",
            url
        ))
    };

    if url.starts_with("https://") || url.starts_with("http://") {
        let parsed = url::Url::parse(url).map_err(|e| Error::Parse(e.to_string()))?;
        let path = parsed
            .path()
            .trim_start_matches('/')
            .trim_end_matches('/')
            .trim_end_matches(".git");
        let mut parts = path.split('/');
        return match (parts.next(), parts.next()) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.to_string(), repo.to_string()))
            }
            _ => Err(Error::Parse(format!("Invalid GitHub URL path: {}", path))),
        };
    }

    if let Some(rest) = url.strip_prefix("git@") {
        let path = rest
            .split_once(':')
            .map(|(_, path)| path.trim_end_matches(".git"))
            .ok_or_else(|| Error::Parse(format!("Invalid SSH URL: {}", url)))?;
        return match path.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.to_string(), repo.to_string()))
            }
            _ => Err(Error::Parse(format!("Invalid SSH URL: {}", url))),
        };
    }

    match url.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.trim_end_matches(".git").to_string()))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shorthand() {
        let (owner, repo) = parse_github_url("acme/web").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "web");
    }

    #[test]
    fn test_parse_https_url() {
        let (owner, repo) = parse_github_url("https://github.com/acme/web").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "web");
    }

    #[test]
    fn test_parse_https_url_with_git_suffix() {
        let (owner, repo) = parse_github_url("https://github.com/acme/web.git").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "web");
    }

    #[test]
    fn test_parse_https_url_with_extra_path() {
        let (owner, repo) =
            parse_github_url("https://github.com/acme/web/pulls?q=is%3Aopen").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "web");
    }

    #[test]
    fn test_parse_ssh_url() {
        let (owner, repo) = parse_github_url("git@github.com:acme/web.git").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "web");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_github_url("invalid").is_err());
        assert!(parse_github_url("a/b/c").is_err());
        assert!(parse_github_url("/web").is_err());
        assert!(parse_github_url("https://github.com/acme").is_err());
    }

    #[tokio::test]
    async fn test_with_token_keeps_owner() {
        let config = Config::default().with_cli_overrides(Some("acme".to_string()));
        let client = GitHubClient::with_token(&config, "ghp_test").unwrap();
        assert_eq!(client.owner(), "acme");
        assert_eq!(client.fetch_config().batch_size, 5);
    }
}
