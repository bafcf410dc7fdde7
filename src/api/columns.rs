//! Kanban column endpoints

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::funnel::{KanbanColumn, Lead};
use crate::ids::RecordId;
use crate::wire::{lenient_rows, null_as_default, valid_rows};

use super::{endpoints, persisted_path, ApiClient, LeadRecord};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnRecord {
    pub id: RecordId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(default)]
    pub color: Option<String>,
    /// Only filled by endpoints that embed the column's leads
    #[serde(default, deserialize_with = "lenient_rows")]
    pub leads: Vec<LeadRecord>,
}

impl From<ColumnRecord> for KanbanColumn {
    fn from(record: ColumnRecord) -> Self {
        let id = record.id;
        let leads = record
            .leads
            .into_iter()
            .map(|lead| Lead {
                column_id: Some(id.clone()),
                ..Lead::from(lead)
            })
            .collect();
        KanbanColumn {
            id,
            title: record.title,
            order: record.order,
            color: record.color,
            leads,
        }
    }
}

/// Body of `POST /v1/kanban-columns` and `PUT /v1/kanban-columns/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPayload {
    pub title: String,
    pub order: i64,
    pub color: Option<String>,
}

impl From<&KanbanColumn> for ColumnPayload {
    fn from(column: &KanbanColumn) -> Self {
        Self {
            title: column.title.clone(),
            order: column.order,
            color: column.color.clone(),
        }
    }
}

/// One entry of a bulk reorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnOrder {
    pub id: RecordId,
    pub order: i64,
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    columns: &'a [ColumnOrder],
}

impl ApiClient {
    pub async fn list_columns(&self) -> Result<Vec<ColumnRecord>> {
        let rows: Vec<serde_json::Value> = self
            .request(Method::GET, endpoints::KANBAN_COLUMNS)
            .await?
            .execute()
            .await?;
        Ok(valid_rows(rows, "column"))
    }

    pub async fn create_column(&self, payload: &ColumnPayload) -> Result<ColumnRecord> {
        self.request(Method::POST, endpoints::KANBAN_COLUMNS)
            .await?
            .json(payload)?
            .execute()
            .await
    }

    pub async fn update_column(
        &self,
        id: &RecordId,
        payload: &ColumnPayload,
    ) -> Result<ColumnRecord> {
        let path = persisted_path(endpoints::KANBAN_COLUMNS, id)?;
        self.request(Method::PUT, &path)
            .await?
            .json(payload)?
            .execute()
            .await
    }

    pub async fn delete_column(&self, id: &RecordId) -> Result<()> {
        let path = persisted_path(endpoints::KANBAN_COLUMNS, id)?;
        self.request(Method::DELETE, &path)
            .await?
            .execute_unit()
            .await
    }

    /// Persists the order of several columns at once.
    pub async fn reorder_columns(&self, columns: &[ColumnOrder]) -> Result<()> {
        let path = format!("{}/reorder", endpoints::KANBAN_COLUMNS);
        self.request(Method::POST, &path)
            .await?
            .json(&ReorderBody { columns })?
            .execute_unit()
            .await
    }
}
