//! Projects V2: listing, view/field metadata and items

use crate::{Error, GitHubClient, Result};
use ghdash_core::project::{
    FieldConfig, FieldKind, FieldOption, ProjectView, RawItem, SortDirection, SortSpec, ViewLayout,
};
use octocrab::Page;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

const LIST_PROJECTS_QUERY: &str = r#"
    query($owner: String!) {
        organization(login: $owner) {
            projectsV2(first: 50) {
                nodes {
                    id
                    number
                    title
                    shortDescription
                    url
                    createdAt
                    updatedAt
                    closed
                    items {
                        totalCount
                    }
                }
            }
        }
    }
"#;

const PROJECT_QUERY: &str = r#"
    query($owner: String!, $number: Int!) {
        organization(login: $owner) {
            projectV2(number: $number) {
                id
                number
                title
                shortDescription
                url
                views(first: 20) {
                    nodes {
                        id
                        name
                        number
                        layout
                        filter
                        groupByFields(first: 5) {
                            nodes {
                                ... on ProjectV2FieldCommon {
                                    name
                                }
                            }
                        }
                        sortByFields(first: 10) {
                            nodes {
                                field {
                                    ... on ProjectV2FieldCommon {
                                        name
                                    }
                                }
                                direction
                            }
                        }
                    }
                }
                fields(first: 50) {
                    nodes {
                        ... on ProjectV2FieldCommon {
                            databaseId
                            name
                            dataType
                        }
                        ... on ProjectV2SingleSelectField {
                            options {
                                id
                                name
                                color
                            }
                        }
                    }
                }
            }
        }
    }
"#;

/// Entry of the project list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub short_description: Option<String>,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
    pub closed: bool,
    pub item_count: u64,
}

/// Project metadata needed to render its views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub short_description: Option<String>,
    pub url: String,
    pub views: Vec<ProjectView>,
    pub fields: Vec<FieldConfig>,
    /// REST ids of the fields whose values are requested with items
    ///
    /// Title, assignees, labels and repository are left out since the item
    /// content already carries them.
    pub field_ids: Vec<u64>,
}

impl ProjectDetails {
    /// View by id, number or name (ignoring case)
    pub fn find_view(&self, key: &str) -> Result<&ProjectView> {
        self.views
            .iter()
            .find(|v| v.is_named(key))
            .ok_or_else(|| Error::ViewNotFound(key.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

impl<T> Nodes<T> {
    fn into_vec(self) -> Vec<T> {
        self.nodes.into_iter().flatten().collect()
    }
}

#[derive(Debug, Deserialize)]
struct OrganizationData<T> {
    organization: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectListData {
    projects_v2: Nodes<ProjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectNode {
    id: String,
    number: u64,
    title: String,
    short_description: Option<String>,
    url: String,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    closed: bool,
    items: Option<TotalCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectData {
    project_v2: Option<ProjectDetailsNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDetailsNode {
    id: String,
    number: u64,
    title: String,
    short_description: Option<String>,
    url: String,
    views: Nodes<ViewNode>,
    fields: Nodes<FieldNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewNode {
    id: String,
    name: String,
    number: Option<u64>,
    #[serde(default)]
    layout: ViewLayout,
    filter: Option<String>,
    group_by_fields: Option<Nodes<NamedNode>>,
    sort_by_fields: Option<Nodes<SortNode>>,
}

#[derive(Debug, Deserialize)]
struct NamedNode {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SortNode {
    field: Option<NamedNode>,
    #[serde(default)]
    direction: SortDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldNode {
    database_id: Option<u64>,
    name: Option<String>,
    #[serde(default)]
    data_type: String,
    #[serde(default)]
    options: Vec<FieldOption>,
}

impl From<ProjectNode> for ProjectSummary {
    fn from(node: ProjectNode) -> Self {
        Self {
            id: node.id,
            number: node.number,
            title: node.title,
            short_description: node.short_description.filter(|d| !d.is_empty()),
            url: node.url,
            created_at: node.created_at,
            updated_at: node.updated_at,
            closed: node.closed,
            item_count: node.items.map(|i| i.total_count).unwrap_or_default(),
        }
    }
}

impl From<ViewNode> for ProjectView {
    fn from(node: ViewNode) -> Self {
        let group_by_fields = node
            .group_by_fields
            .map(Nodes::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|f| f.name)
            .collect();
        let sort_by_fields = node
            .sort_by_fields
            .map(Nodes::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| {
                let name = s.field.and_then(|f| f.name)?;
                Some(SortSpec::new(name, s.direction))
            })
            .collect();

        Self {
            id: node.id,
            name: node.name,
            number: node.number,
            layout: node.layout,
            filter: node.filter.filter(|f| !f.trim().is_empty()),
            group_by_fields,
            sort_by_fields,
        }
    }
}

/// Whether item values of a field must be asked for explicitly
///
/// Titles come back unasked; assignees, labels and repository are read from
/// the item content instead.
fn requests_values(data_type: &str) -> bool {
    !data_type.eq_ignore_ascii_case("TITLE") && !FieldKind::from_tag(data_type).mirrors_content()
}

impl From<ProjectDetailsNode> for ProjectDetails {
    fn from(node: ProjectDetailsNode) -> Self {
        let field_nodes = node.fields.into_vec();
        let field_ids = field_nodes
            .iter()
            .filter(|f| requests_values(&f.data_type))
            .filter_map(|f| f.database_id)
            .collect();
        let fields = field_nodes
            .into_iter()
            .filter_map(|f| {
                Some(FieldConfig {
                    name: f.name?,
                    data_type: f.data_type,
                    options: f.options,
                })
            })
            .collect();

        Self {
            id: node.id,
            number: node.number,
            title: node.title,
            short_description: node.short_description,
            url: node.url,
            views: node
                .views
                .into_vec()
                .into_iter()
                .map(ProjectView::from)
                .collect(),
            fields,
            field_ids,
        }
    }
}

#[derive(Debug, Serialize)]
struct ItemsQuery {
    per_page: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
}

impl GitHubClient {
    /// Open projects of the owner, most recently updated first
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        debug!(owner = %self.owner(), "Listing projects");

        let data: OrganizationData<ProjectListData> = self
            .graphql_query(LIST_PROJECTS_QUERY, &json!({ "owner": self.owner() }))
            .await?;

        let mut projects: Vec<ProjectSummary> = data
            .organization
            .map(|o| o.projects_v2.into_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.closed)
            .map(ProjectSummary::from)
            .collect();

        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        info!(count = projects.len(), "Fetched projects");
        Ok(projects)
    }

    /// Views and field schema of a project
    pub async fn get_project(&self, number: u64) -> Result<ProjectDetails> {
        debug!(owner = %self.owner(), number, "Fetching project metadata");

        let data: OrganizationData<ProjectData> = self
            .graphql_query(
                PROJECT_QUERY,
                &json!({ "owner": self.owner(), "number": number }),
            )
            .await?;

        let project: ProjectDetails = data
            .organization
            .and_then(|o| o.project_v2)
            .ok_or(Error::ProjectNotFound(number))?
            .into();

        info!(
            number,
            views = project.views.len(),
            fields = project.fields.len(),
            "Fetched project metadata"
        );
        Ok(project)
    }

    /// All items of a project, following pagination
    ///
    /// `field_ids` selects the fields whose values are included (see
    /// [`ProjectDetails::field_ids`]); without them the API returns only the
    /// title.
    pub async fn list_project_items(&self, number: u64, field_ids: &[u64]) -> Result<Vec<RawItem>> {
        let route = format!("/orgs/{}/projectsV2/{}/items", self.owner(), number);
        let query = ItemsQuery {
            per_page: self.fetch_config().page_size,
            fields: (!field_ids.is_empty()).then(|| {
                field_ids
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            }),
        };

        let mut page: Page<RawItem> = self
            .client()
            .get(&route, Some(&query))
            .await
            .map_err(|e| not_found_as_project(e, number))?;

        let mut items = page.take_items();
        let mut page_num = 1u32;

        while let Some(mut next) = self
            .client()
            .get_page::<RawItem>(&page.next)
            .await
            .map_err(Error::from_api)?
        {
            page_num += 1;
            items.extend(next.take_items());
            debug!(page = page_num, total = items.len(), "Fetched project items page");
            page = next;
        }

        info!(number, count = items.len(), pages = page_num, "Fetched project items");
        Ok(items)
    }
}

fn not_found_as_project(err: octocrab::Error, number: u64) -> Error {
    let err = Error::from_api(err);
    if err.is_not_found() {
        Error::ProjectNotFound(number)
    } else {
        err
    }
}
