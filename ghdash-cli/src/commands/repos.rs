//! Repository overview

use clap::Args;
use ghdash_core::dashboard::summarize_repositories;
use ghdash_core::Config;

use super::{connect, print_json, truncate};

/// Arguments for the repos command
#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Only repositories in this category (e.g. "API/Service")
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only repositories whose stack includes this language or topic
    #[arg(short, long)]
    pub tech: Option<String>,
}

impl ReposArgs {
    pub async fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let client = connect(config)?;
        let repos = client
            .list_repositories()
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let summaries: Vec<_> = summarize_repositories(&repos)
            .into_iter()
            .filter(|s| match &self.category {
                Some(c) => s.category.eq_ignore_ascii_case(c),
                None => true,
            })
            .filter(|s| match &self.tech {
                Some(t) => s.tech_stack.iter().any(|x| x.eq_ignore_ascii_case(t)),
                None => true,
            })
            .collect();

        if json {
            return print_json(&summaries);
        }

        if summaries.is_empty() {
            println!("No repositories found");
            return Ok(());
        }

        for repo in &summaries {
            let visibility = if repo.is_private { "private" } else { "public" };
            println!(
                "{:<40} {:<8} {:<18} {:<12} *{:<5} {}",
                truncate(&repo.full_name, 40),
                visibility,
                repo.category,
                truncate(&repo.language, 12),
                repo.stars,
                truncate(&repo.description, 60)
            );
            if !repo.tech_stack.is_empty() {
                println!("    {}", repo.tech_stack.join(", "));
            }
        }
        println!();
        println!("{} repositories", summaries.len());

        Ok(())
    }
}
