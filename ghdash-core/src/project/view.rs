//! Project views and field schema

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fold_tag;

/// Layout of a project view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLayout {
    #[default]
    #[serde(alias = "TABLE", alias = "TABLE_LAYOUT")]
    Table,
    #[serde(alias = "BOARD", alias = "BOARD_LAYOUT")]
    Board,
    #[serde(alias = "ROADMAP", alias = "ROADMAP_LAYOUT")]
    Roadmap,
}

impl std::fmt::Display for ViewLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewLayout::Table => write!(f, "table"),
            ViewLayout::Board => write!(f, "board"),
            ViewLayout::Roadmap => write!(f, "roadmap"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sort direction: {}", other)),
        }
    }
}

/// One sort key of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(alias = "fieldName")]
    pub field_name: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field_name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field_name: field_name.into(),
            direction,
        }
    }
}

/// Parses `Field` or `Field:asc` / `Field:desc`
impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, direction) = match s.rsplit_once(':') {
            Some((name, dir)) => (name, dir.parse()?),
            None => (s, SortDirection::Asc),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("Invalid sort spec: {:?}", s));
        }
        Ok(Self::new(name, direction))
    }
}

/// Saved view of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub layout: ViewLayout,
    /// Filter string in the project filter language
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default, alias = "groupByFields")]
    pub group_by_fields: Vec<String>,
    #[serde(default, alias = "sortByFields")]
    pub sort_by_fields: Vec<SortSpec>,
}

impl ProjectView {
    /// The field items are grouped by; only the first is used
    pub fn group_field(&self) -> Option<&str> {
        self.group_by_fields
            .first()
            .map(String::as_str)
            .filter(|f| !f.is_empty())
    }

    /// Match by id, number or case-insensitive name
    pub fn is_named(&self, key: &str) -> bool {
        self.id == key
            || self.number.is_some_and(|n| n.to_string() == key)
            || self.name.eq_ignore_ascii_case(key)
    }
}

/// Option of a single-select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Color token from the project schema (`GREEN`, `RED`, ...)
    #[serde(default)]
    pub color: Option<String>,
}

/// Field schema entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default, alias = "dataType")]
    pub data_type: String,
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl FieldConfig {
    /// Position and option matching `value`, exact name first, then ignoring case
    pub fn find_option(&self, value: &str) -> Option<(usize, &FieldOption)> {
        self.options
            .iter()
            .enumerate()
            .find(|(_, opt)| opt.name == value)
            .or_else(|| {
                let folded = value.to_lowercase();
                self.options
                    .iter()
                    .enumerate()
                    .find(|(_, opt)| opt.name.to_lowercase() == folded)
            })
    }

    pub fn is_single_select(&self) -> bool {
        fold_tag(&self.data_type) == "singleselect"
    }

    /// Schema entry named `name`, ignoring case
    pub fn lookup<'a>(fields: &'a [FieldConfig], name: &str) -> Option<&'a FieldConfig> {
        fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout_aliases() {
        let layout: ViewLayout = serde_json::from_value(json!("BOARD_LAYOUT")).unwrap();
        assert_eq!(layout, ViewLayout::Board);
        let layout: ViewLayout = serde_json::from_value(json!("table")).unwrap();
        assert_eq!(layout, ViewLayout::Table);
        assert_eq!(ViewLayout::Roadmap.to_string(), "roadmap");
    }

    #[test]
    fn test_sort_spec_from_str() {
        assert_eq!(
            "Priority:desc".parse::<SortSpec>().unwrap(),
            SortSpec::new("Priority", SortDirection::Desc)
        );
        assert_eq!(
            "Status".parse::<SortSpec>().unwrap(),
            SortSpec::new("Status", SortDirection::Asc)
        );
        assert!("Status:sideways".parse::<SortSpec>().is_err());
        assert!(":asc".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_view_from_graphql_shape() {
        let view: ProjectView = serde_json::from_value(json!({
            "id": "PVTV_1",
            "name": "Board",
            "number": 2,
            "layout": "BOARD_LAYOUT",
            "filter": "is:open",
            "groupByFields": ["Status"],
            "sortByFields": [{"fieldName": "Priority", "direction": "DESC"}]
        }))
        .unwrap();

        assert_eq!(view.layout, ViewLayout::Board);
        assert_eq!(view.group_field(), Some("Status"));
        assert_eq!(view.sort_by_fields[0].direction, SortDirection::Desc);
        assert!(view.is_named("board"));
        assert!(view.is_named("2"));
        assert!(view.is_named("PVTV_1"));
    }

    #[test]
    fn test_find_option() {
        let field = FieldConfig {
            name: "Status".to_string(),
            data_type: "SINGLE_SELECT".to_string(),
            options: vec![
                FieldOption {
                    id: None,
                    name: "Todo".to_string(),
                    color: Some("GRAY".to_string()),
                },
                FieldOption {
                    id: None,
                    name: "Done".to_string(),
                    color: Some("GREEN".to_string()),
                },
            ],
        };

        assert!(field.is_single_select());
        assert_eq!(field.find_option("Done").map(|(i, _)| i), Some(1));
        assert_eq!(field.find_option("todo").map(|(i, _)| i), Some(0));
        assert!(field.find_option("Blocked").is_none());
    }
}
