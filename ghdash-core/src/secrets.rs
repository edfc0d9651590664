//! GitHub token storage for ghdash
//!
//! The token is looked up in the environment first (`GHDASH_TOKEN`,
//! `GITHUB_TOKEN`, then `GH_TOKEN` as exported by the `gh` CLI) and then in
//! `~/.config/ghdash/secrets.toml`. The file must not be readable by group or
//! others on Unix.
//!
//! The same token is used for octocrab REST calls and for the GraphQL
//! project queries, so it needs `read:project` on top of repository access.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Environment variables checked for a token, highest priority first
pub const TOKEN_ENV_VARS: &[&str] = &["GHDASH_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

const TEMPLATE: &str = r#"# ghdash secrets (keep this file private: chmod 600)

[github]
# Classic token scopes: repo, read:org, read:project
# Fine-grained token: read access to contents, pull requests, actions,
# metadata and organization projects
token = ""
"#;

/// Contents of `secrets.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    pub github: GitHubSecrets,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    pub token: Option<String>,
}

/// Token format, told apart by prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `ghp_`
    Classic,
    /// `github_pat_`
    FineGrained,
    /// `gho_`, as issued to `gh auth login`
    OAuth,
    /// `ghs_`, GitHub App installation token
    App,
    Unrecognized,
}

impl TokenKind {
    pub fn of(token: &str) -> Self {
        const PREFIXES: &[(&str, TokenKind)] = &[
            ("github_pat_", TokenKind::FineGrained),
            ("ghp_", TokenKind::Classic),
            ("gho_", TokenKind::OAuth),
            ("ghs_", TokenKind::App),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| token.starts_with(*prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::Unrecognized)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Classic => "classic",
            TokenKind::FineGrained => "fine-grained",
            TokenKind::OAuth => "oauth",
            TokenKind::App => "app installation",
            TokenKind::Unrecognized => "unrecognized",
        })
    }
}

/// Where a resolved token came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Env(&'static str),
    File,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Env(var) => write!(f, "${}", var),
            TokenSource::File => f.write_str("secrets file"),
        }
    }
}

/// A usable token plus its origin
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub value: String,
    pub source: TokenSource,
}

impl ResolvedToken {
    pub fn kind(&self) -> TokenKind {
        TokenKind::of(&self.value)
    }
}

// Keeps the token itself out of logs
impl fmt::Debug for ResolvedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedToken")
            .field("kind", &self.kind())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Secrets {
    /// Secrets from the default location, or empty when there is no file
    pub fn load() -> Result<Self> {
        match Self::default_secrets_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        check_private(path)?;
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// `~/.config/ghdash/secrets.toml`
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghdash").join("secrets.toml"))
    }

    /// Token from the environment or this file
    pub fn resolve_token(&self) -> Option<ResolvedToken> {
        self.resolve_token_with(|var| std::env::var(var).ok())
    }

    fn resolve_token_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<ResolvedToken> {
        let from_env = TOKEN_ENV_VARS.iter().find_map(|var| {
            let value = non_blank(env(*var))?;
            Some(ResolvedToken {
                value,
                source: TokenSource::Env(*var),
            })
        });
        let resolved = from_env.or_else(|| {
            non_blank(self.github.token.clone()).map(|value| ResolvedToken {
                value,
                source: TokenSource::File,
            })
        })?;

        if resolved.kind() == TokenKind::Unrecognized {
            warn!(source = %resolved.source, "GitHub token has an unrecognized format");
        } else {
            debug!(source = %resolved.source, kind = %resolved.kind(), "Using GitHub token");
        }
        Some(resolved)
    }

    /// Write an empty secrets file at the default location
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;
        Self::write_template(&path)?;
        Ok(path)
    }

    /// Write an empty secrets file at `path` with owner-only permissions
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_template(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, TEMPLATE)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        warn!(path = %path.display(), "Created secrets template, add your token to it");
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(unix)]
fn check_private(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(Error::Config(format!(
            "Secrets file {} has insecure permissions {:o}; run: chmod 600 {}",
            path.display(),
            mode,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_private(_path: &Path) -> Result<()> {
    Ok(())
}
