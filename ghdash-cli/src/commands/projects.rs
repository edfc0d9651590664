//! Project listing and field discovery

use chrono::Utc;
use clap::Args;
use ghdash_core::dashboard::format_time_ago;
use ghdash_core::query::FilterOptions;
use ghdash_core::{available_group_fields, filter_options, normalize_all, Config, FieldConfig};
use serde::Serialize;

use super::{connect, print_json, truncate};

/// List the owner's open projects, most recently updated first
pub async fn list_projects(config: &Config, json: bool) -> anyhow::Result<()> {
    let client = connect(config)?;
    let projects = client
        .list_projects()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if json {
        return print_json(&projects);
    }

    if projects.is_empty() {
        println!("No open projects for {}", client.owner());
        return Ok(());
    }

    let now = Utc::now();
    println!("{:<6} {:<40} {:>6}  UPDATED", "NUMBER", "TITLE", "ITEMS");
    println!("{}", "-".repeat(70));
    for project in &projects {
        println!(
            "{:<6} {:<40} {:>6}  {}",
            project.number,
            truncate(&project.title, 40),
            project.item_count,
            format_time_ago(&project.updated_at, now)
        );
    }
    println!();
    println!("{} open project(s)", projects.len());

    Ok(())
}

/// Arguments for the fields command
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Project number
    pub number: u64,
}

#[derive(Debug, Serialize)]
struct FieldsReport<'a> {
    group_fields: Vec<String>,
    schema: &'a [FieldConfig],
    values: FilterOptions,
}

impl FieldsArgs {
    pub async fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let client = connect(config)?;
        let project = client
            .get_project(self.number)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let raw = client
            .list_project_items(self.number, &project.field_ids)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let items = normalize_all(&raw);

        let report = FieldsReport {
            group_fields: available_group_fields(&items),
            schema: &project.fields,
            values: filter_options(&items),
        };

        if json {
            return print_json(&report);
        }

        println!("{} ({} items)", project.title, items.len());
        println!();
        println!("Group by:");
        for field in &report.group_fields {
            println!("  {}", field);
        }

        let selects: Vec<_> = project
            .fields
            .iter()
            .filter(|f| f.is_single_select())
            .collect();
        if !selects.is_empty() {
            println!();
            println!("Single-select options:");
            for field in selects {
                let names: Vec<&str> = field.options.iter().map(|o| o.name.as_str()).collect();
                println!("  {}: {}", field.name, names.join(", "));
            }
        }

        println!();
        println!("Filter values:");
        print_values("state", &report.values.states);
        print_values("status", &report.values.statuses);
        print_values("repo", &report.values.repositories);
        print_values("assignee", &report.values.assignees);

        Ok(())
    }
}

fn print_values(label: &str, values: &[String]) {
    if values.is_empty() {
        println!("  {}: (none)", label);
    } else {
        println!("  {}: {}", label, values.join(", "));
    }
}
