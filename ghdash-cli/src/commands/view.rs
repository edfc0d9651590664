//! Project view rendering

use chrono::Utc;
use clap::{Args, ValueEnum};
use ghdash_core::dashboard::format_time_ago;
use ghdash_core::view::resolve::ALL_ITEMS;
use ghdash_core::{
    apply_view, normalize_all, Config, GroupedItems, ItemFilters, ItemType, NormalizedItem,
    ProjectView, SortSpec,
};
use tracing::debug;

use super::{connect, print_json, repo_filter, truncate};

/// Item type filter
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeFilter {
    Issue,
    Pr,
    Draft,
}

impl From<TypeFilter> for ItemType {
    fn from(t: TypeFilter) -> Self {
        match t {
            TypeFilter::Issue => ItemType::Issue,
            TypeFilter::Pr => ItemType::PullRequest,
            TypeFilter::Draft => ItemType::DraftIssue,
        }
    }
}

/// Arguments for the view command
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Project number
    pub number: u64,

    /// View id, number or name (defaults to the project's first view)
    #[arg(long)]
    pub view: Option<String>,

    /// Filter string, replacing the view's own (e.g. "status:Todo -label:bug")
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Field to group by, replacing the view's grouping ("none" disables it)
    #[arg(short, long)]
    pub group_by: Option<String>,

    /// Sort key as Field[:asc|desc], may be repeated
    #[arg(short, long)]
    pub sort: Vec<SortSpec>,

    /// Free-text search over title, number, repository and field values
    #[arg(long)]
    pub search: Option<String>,

    /// Only items in this state (open, closed, merged)
    #[arg(long)]
    pub state: Option<String>,

    /// Only items of this type
    #[arg(long = "type", value_enum)]
    pub item_type: Option<TypeFilter>,

    /// Only items with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Only items assigned to this login
    #[arg(long)]
    pub assignee: Option<String>,

    /// Only items from this repository (owner/repo or URL)
    #[arg(long)]
    pub repo: Option<String>,
}

impl ViewArgs {
    pub async fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let client = connect(config)?;
        let project = client
            .get_project(self.number)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let base = match &self.view {
            Some(key) => project
                .find_view(key)
                .map_err(|e| anyhow::anyhow!("{}", e))?
                .clone(),
            None => project.views.first().cloned().unwrap_or_else(all_items_view),
        };
        let view = self.effective_view(base);

        let raw = client
            .list_project_items(self.number, &project.field_ids)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let items = self.item_filters()?.apply(&normalize_all(&raw));

        debug!(view = %view.name, items = items.len(), "Rendering view");
        let groups = apply_view(&items, &view, &project.fields);

        if json {
            return print_json(&groups);
        }

        println!("{} / {} ({})", project.title, view.name, view.layout);
        if let Some(filter) = view.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            println!("Filter: {}", filter);
        }
        println!();
        print_groups(&groups);

        Ok(())
    }

    /// The selected view with command-line overrides applied
    fn effective_view(&self, mut view: ProjectView) -> ProjectView {
        if let Some(filter) = &self.filter {
            view.filter = Some(filter.clone());
        }
        if let Some(field) = &self.group_by {
            view.group_by_fields = if field.eq_ignore_ascii_case("none") {
                Vec::new()
            } else {
                vec![field.clone()]
            };
        }
        if !self.sort.is_empty() {
            view.sort_by_fields = self.sort.clone();
        }
        view
    }

    fn item_filters(&self) -> anyhow::Result<ItemFilters> {
        Ok(ItemFilters {
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            state: self.state.as_deref().map(str::to_lowercase),
            item_type: self.item_type.map(ItemType::from),
            status: self.status.clone(),
            assignee: self.assignee.clone(),
            repository: repo_filter(self.repo.as_deref())?,
        })
    }
}

/// Stand-in for projects that have no saved views
fn all_items_view() -> ProjectView {
    ProjectView {
        id: "all".to_string(),
        name: ALL_ITEMS.to_string(),
        ..Default::default()
    }
}

fn print_groups(groups: &[GroupedItems]) {
    let now = Utc::now();
    let total: usize = groups.iter().map(|g| g.count).sum();

    for group in groups {
        match &group.color {
            Some(color) => println!("== {} ({}) [{}]", group.name, group.count, color),
            None => println!("== {} ({})", group.name, group.count),
        }
        for item in &group.items {
            println!("  {}", item_row(item, now));
        }
        println!();
    }

    println!("{} item(s) in {} group(s)", total, groups.len());
}

fn item_row(item: &NormalizedItem, now: chrono::DateTime<Utc>) -> String {
    let logins: Vec<&str> = item.assignees.iter().map(|a| a.login.as_str()).collect();
    format!(
        "{:<7} {:<5} {:<50} {:<25} {:<15} {}",
        item.reference().unwrap_or_default(),
        item.item_type.short_label(),
        truncate(&item.title, 50),
        truncate(&item.full_repository(), 25),
        truncate(&logins.join(","), 15),
        format_time_ago(&item.updated_at, now)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ghdash_core::SortDirection;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ViewArgs,
    }

    fn parse(argv: &[&str]) -> ViewArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    fn saved_view() -> ProjectView {
        ProjectView {
            id: "PVTV_1".to_string(),
            name: "Board".to_string(),
            filter: Some("is:open".to_string()),
            group_by_fields: vec!["Status".to_string()],
            sort_by_fields: vec![SortSpec::new("Priority", SortDirection::Asc)],
            ..Default::default()
        }
    }

    #[test]
    fn test_view_without_overrides() {
        let args = parse(&["7"]);
        assert_eq!(args.effective_view(saved_view()), saved_view());
    }

    #[test]
    fn test_overrides_replace_view_settings() {
        let args = parse(&[
            "7",
            "--filter",
            "label:bug",
            "--group-by",
            "Assignees",
            "--sort",
            "Updated:desc",
            "--sort",
            "Title",
        ]);
        let view = args.effective_view(saved_view());

        assert_eq!(view.filter.as_deref(), Some("label:bug"));
        assert_eq!(view.group_by_fields, vec!["Assignees"]);
        assert_eq!(
            view.sort_by_fields,
            vec![
                SortSpec::new("Updated", SortDirection::Desc),
                SortSpec::new("Title", SortDirection::Asc),
            ]
        );
        assert_eq!(view.name, "Board");
    }

    #[test]
    fn test_group_by_none_clears_grouping() {
        let args = parse(&["7", "--group-by", "none"]);
        let view = args.effective_view(saved_view());
        assert!(view.group_field().is_none());
    }

    #[test]
    fn test_item_filters_from_flags() {
        let args = parse(&[
            "7",
            "--state",
            "OPEN",
            "--type",
            "pr",
            "--repo",
            "https://github.com/acme/web",
            "--search",
            "  ",
        ]);
        let filters = args.item_filters().unwrap();

        assert_eq!(filters.state.as_deref(), Some("open"));
        assert_eq!(filters.item_type, Some(ItemType::PullRequest));
        assert_eq!(filters.repository.as_deref(), Some("acme/web"));
        assert!(filters.search.is_none());
    }

    #[test]
    fn test_invalid_sort_is_rejected() {
        let result = TestCli::try_parse_from(["test", "7", "--sort", ":desc"]);
        assert!(result.is_err());
    }
}
