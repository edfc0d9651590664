//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub REST API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Transport error talking to the GraphQL endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    /// Project not found for the configured owner
    #[error("Project #{0} not found")]
    ProjectNotFound(u64),

    /// No view with the given name, number or id
    #[error("View {0:?} not found")]
    ViewNotFound(String),

    /// Errors reported in a GraphQL response body
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// Rate limit exceeded
    #[error("GitHub rate limit exceeded: {0}")]
    RateLimited(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::MissingEnv(err.to_string())
    }
}

impl Error {
    /// Map an octocrab error onto the more specific variants
    pub(crate) fn from_api(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, backtrace } => {
                let message = source.message.to_lowercase();
                if message.contains("bad credentials") {
                    Error::Auth("Invalid GitHub token".to_string())
                } else if message.contains("rate limit") {
                    Error::RateLimited(source.message.clone())
                } else {
                    Error::Api(octocrab::Error::GitHub { source, backtrace })
                }
            }
            other => Error::Api(other),
        }
    }

    /// Whether the API answered 404 / "Not Found"
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Api(octocrab::Error::GitHub { source, .. }) => {
                source.message.contains("Not Found")
            }
            Error::ProjectNotFound(_) | Error::ViewNotFound(_) => true,
            _ => false,
        }
    }
}
