//! ghdash GitHub - REST and GraphQL fetch layer for ghdash
//!
//! This crate fetches projects, project items, repositories, pull requests
//! and workflow runs for one organization or user. Per-repository listings
//! run in bounded batches.

mod batch;
mod client;
mod error;
mod graphql;
mod projects;
mod pulls;
mod repos;
mod workflows;

pub use batch::run_batched;
pub use client::{parse_github_url, GitHubClient};
pub use error::{Error, Result};
pub use projects::{ProjectDetails, ProjectSummary};
pub use pulls::PullState;
