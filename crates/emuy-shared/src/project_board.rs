//! Items of the GitHub project board fetched through the GraphQL api

/// Column used for items that have no status field set
pub const NO_STATUS: &str = "No Status";

pub const PROJECT_ITEMS_QUERY: &str = r#"query($project: ID!) {
  node(id: $project) {
    ... on ProjectV2 {
      title
      items(first: 100) {
        nodes {
          id
          fieldValueByName(name: "Status") {
            ... on ProjectV2ItemFieldSingleSelectValue { name }
          }
          content {
            ... on Issue { title url number }
            ... on PullRequest { title url number }
            ... on DraftIssue { title }
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct GraphQlRequest<V> {
    pub query: &'static str,
    pub variables: V,
}

#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct BoardVariables {
    pub project: String,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct BoardData {
    pub node: Option<BoardNode>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct BoardNode {
    #[serde(default)]
    pub title: Option<String>,
    pub items: BoardItemConnection,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct BoardItemConnection {
    pub nodes: Vec<RawBoardItem>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawBoardItem {
    pub id: String,
    #[serde(default)]
    pub field_value_by_name: Option<FieldValue>,
    #[serde(default)]
    pub content: Option<ItemContent>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct FieldValue {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ItemContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub number: Option<u64>,
}

/// Flattened board item as the page shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItem {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub number: Option<u64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub status: String,
    pub items: Vec<BoardItem>,
}

impl GraphQlRequest<BoardVariables> {
    pub fn project_items(project_id: &str) -> Self {
        Self {
            query: PROJECT_ITEMS_QUERY,
            variables: BoardVariables {
                project: project_id.to_string(),
            },
        }
    }
}

impl From<RawBoardItem> for BoardItem {
    fn from(value: RawBoardItem) -> Self {
        let content = value.content.unwrap_or(ItemContent {
            title: None,
            url: None,
            number: None,
        });
        Self {
            id: value.id,
            title: content.title.unwrap_or_else(|| "(untitled)".to_string()),
            url: content.url,
            number: content.number,
            status: value.field_value_by_name.and_then(|f| f.name),
        }
    }
}

impl BoardData {
    pub fn into_items(self) -> Vec<BoardItem> {
        self.node
            .map(|n| n.items.nodes.into_iter().map(BoardItem::from).collect())
            .unwrap_or_default()
    }
}

/// Columns in order of first appearance with unset statuses collected last
pub fn group_by_status(items: Vec<BoardItem>) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = Vec::new();
    let mut without_status = Vec::new();
    for item in items {
        let Some(status) = item.status.clone() else {
            without_status.push(item);
            continue;
        };
        match columns.iter_mut().find(|c| c.status == status) {
            Some(column) => column.items.push(item),
            None => columns.push(BoardColumn {
                status,
                items: vec![item],
            }),
        }
    }
    if !without_status.is_empty() {
        columns.push(BoardColumn {
            status: NO_STATUS.to_string(),
            items: without_status,
        });
    }
    columns
}
