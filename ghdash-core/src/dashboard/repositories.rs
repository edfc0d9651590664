//! Repository overview

use serde::{Deserialize, Serialize};

use crate::view::parse_timestamp;

/// Repository as listed by `GET /orgs/{org}/repos` or `/users/{user}/repos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub private: bool,
    pub archived: bool,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub topics: Vec<String>,
    pub size: u64,
    pub default_branch: String,
    pub html_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Dashboard card for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub language: String,
    pub is_private: bool,
    pub stars: u64,
    pub forks: u64,
    pub issues: u64,
    pub topics: Vec<String>,
    pub size: u64,
    pub default_branch: String,
    pub html_url: String,
    pub created_at: String,
    pub updated_at: String,
    pub category: String,
    pub tech_stack: Vec<String>,
}

impl From<&Repository> for RepositorySummary {
    fn from(repo: &Repository) -> Self {
        Self {
            id: repo.id,
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            description: repo
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No description available".to_string()),
            language: repo
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            is_private: repo.private,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            issues: repo.open_issues_count,
            topics: repo.topics.clone(),
            size: repo.size,
            default_branch: repo.default_branch.clone(),
            html_url: repo.html_url.clone(),
            created_at: repo.created_at.clone(),
            updated_at: repo.updated_at.clone(),
            category: categorize_repository(repo).to_string(),
            tech_stack: tech_stack(repo.language.as_deref(), &repo.topics),
        }
    }
}

/// Summaries of the non-archived repositories, most recently updated first
pub fn summarize_repositories(repos: &[Repository]) -> Vec<RepositorySummary> {
    let mut summaries: Vec<RepositorySummary> = repos
        .iter()
        .filter(|r| !r.archived)
        .map(RepositorySummary::from)
        .collect();
    summaries.sort_by(|a, b| {
        parse_timestamp(&b.updated_at).cmp(&parse_timestamp(&a.updated_at))
    });
    summaries
}

/// Coarse category from topics, name and language
///
/// Rules are checked in order and the first hit wins, so a TypeScript API
/// server is still a "Web Application".
pub fn categorize_repository(repo: &Repository) -> &'static str {
    let name = repo.name.to_lowercase();
    let language = repo.language.as_deref().unwrap_or_default().to_lowercase();
    let topic = |t: &str| repo.topics.iter().any(|x| x == t);
    let named = |s: &str| name.contains(s);

    if topic("webapp")
        || topic("website")
        || named("web")
        || named("app")
        || language == "typescript"
        || language == "javascript"
    {
        "Web Application"
    } else if topic("api")
        || topic("server")
        || named("api")
        || named("server")
        || named("service")
    {
        "API/Service"
    } else if topic("library") || topic("component") || named("library") || named("component") {
        "Library/Component"
    } else if topic("documentation") || named("doc") || named("guide") || language == "markdown" {
        "Documentation"
    } else if topic("tool") || topic("utility") || named("tool") || named("util") {
        "Tool/Utility"
    } else {
        "General"
    }
}

const TECH_TOPICS: &[&str] = &[
    "vue",
    "nuxt",
    "react",
    "next",
    "node",
    "typescript",
    "javascript",
    "python",
    "docker",
    "kubernetes",
    "aws",
    "vercel",
    "supabase",
];

/// Primary language followed by recognized technology topics
pub fn tech_stack(language: Option<&str>, topics: &[String]) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    let candidates = language.into_iter().chain(
        topics
            .iter()
            .map(String::as_str)
            .filter(|t| TECH_TOPICS.contains(&t.to_lowercase().as_str())),
    );
    for entry in candidates {
        if !stack.iter().any(|s| s == entry) {
            stack.push(entry.to_string());
        }
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, language: Option<&str>, topics: &[&str]) -> Repository {
        Repository {
            name: name.to_string(),
            full_name: format!("acme/{}", name),
            language: language.map(str::to_string),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_categories() {
        let cases = [
            (repo("dashboard", Some("TypeScript"), &[]), "Web Application"),
            (repo("billing-api", Some("Go"), &[]), "API/Service"),
            (repo("widgets", Some("Rust"), &["component"]), "Library/Component"),
            (repo("handbook", None, &["documentation"]), "Documentation"),
            (repo("cli-utils", Some("Rust"), &[]), "Tool/Utility"),
            (repo("misc", Some("Rust"), &[]), "General"),
        ];
        for (repo, expected) in &cases {
            assert_eq!(categorize_repository(repo), *expected, "{}", repo.name);
        }
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(
            categorize_repository(&repo("payments-api", Some("JavaScript"), &["api"])),
            "Web Application"
        );
    }

    #[test]
    fn test_tech_stack() {
        let topics: Vec<String> = ["docker", "rust-lang", "TypeScript", "vue"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            tech_stack(Some("TypeScript"), &topics),
            vec!["TypeScript", "docker", "vue"]
        );
        assert!(tech_stack(None, &[]).is_empty());
    }

    #[test]
    fn test_summaries_skip_archived_and_sort() {
        let mut old = repo("old", None, &[]);
        old.updated_at = "2023-01-01T00:00:00Z".to_string();
        let mut new = repo("new", Some("Rust"), &[]);
        new.updated_at = "2024-01-01T00:00:00Z".to_string();
        let mut archived = repo("gone", None, &[]);
        archived.archived = true;

        let summaries = summarize_repositories(&[old, archived, new]);
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
        assert_eq!(summaries[1].description, "No description available");
        assert_eq!(summaries[1].language, "Unknown");
        assert_eq!(summaries[0].language, "Rust");
    }
}
