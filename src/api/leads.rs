//! Lead endpoints

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::funnel::{Lead, LeadStatus};
use crate::ids::RecordId;
use crate::wire::{null_as_default, timestamp_opt, valid_rows};

use super::{endpoints, persisted_path, ApiClient};

/// A lead as the backend returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeadRecord {
    pub id: RecordId,
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub column_id: Option<RecordId>,
    #[serde(default, deserialize_with = "timestamp_opt")]
    pub data_cadastro: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeadRecord {
    /// Registration time, falling back to the row's creation time.
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        self.data_cadastro.or(self.created_at)
    }
}

impl From<LeadRecord> for Lead {
    fn from(record: LeadRecord) -> Self {
        let data_cadastro = record.registered_at().unwrap_or_else(Utc::now);
        Lead {
            id: record.id,
            nome: record.nome,
            email: record.email,
            telefone: record.telefone,
            status: record.status,
            tags: record.tags,
            data_cadastro,
            column_id: record
                .column_id
                .filter(|id| !matches!(id, RecordId::Local(raw) if raw.is_empty())),
            observacoes: record.observacoes,
        }
    }
}

/// Body of `POST /v1/leads` and `PUT /v1/leads/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadPayload {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub observacoes: Option<String>,
    pub column_id: Option<RecordId>,
    /// Only sent on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_cadastro: Option<DateTime<Utc>>,
}

impl From<&Lead> for LeadPayload {
    fn from(lead: &Lead) -> Self {
        Self {
            nome: lead.nome.clone(),
            email: lead.email.clone(),
            telefone: lead.telefone.clone(),
            status: lead.status,
            tags: lead.tags.clone(),
            observacoes: lead.observacoes.clone(),
            column_id: lead.column_id.clone(),
            data_cadastro: None,
        }
    }
}

/// Body of `PATCH /v1/leads/{id}/move`. A `None` column means the backlog
/// and is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveLeadRequest {
    pub column_id: Option<RecordId>,
    pub new_index: usize,
}

impl ApiClient {
    pub async fn list_leads(&self) -> Result<Vec<LeadRecord>> {
        let rows: Vec<serde_json::Value> = self
            .request(Method::GET, endpoints::LEADS)
            .await?
            .execute()
            .await?;
        Ok(valid_rows(rows, "lead"))
    }

    pub async fn create_lead(&self, payload: &LeadPayload) -> Result<LeadRecord> {
        self.request(Method::POST, endpoints::LEADS)
            .await?
            .json(payload)?
            .execute()
            .await
    }

    pub async fn update_lead(&self, id: &RecordId, payload: &LeadPayload) -> Result<LeadRecord> {
        let path = persisted_path(endpoints::LEADS, id)?;
        self.request(Method::PUT, &path)
            .await?
            .json(payload)?
            .execute()
            .await
    }

    /// Moves a lead to a column (or the backlog) at the given position.
    pub async fn move_lead(&self, id: &RecordId, request: &MoveLeadRequest) -> Result<()> {
        let path = format!("{}/move", persisted_path(endpoints::LEADS, id)?);
        self.request(Method::PATCH, &path)
            .await?
            .json(request)?
            .execute_unit()
            .await
    }

    pub async fn delete_lead(&self, id: &RecordId) -> Result<()> {
        let path = persisted_path(endpoints::LEADS, id)?;
        self.request(Method::DELETE, &path)
            .await?
            .execute_unit()
            .await
    }
}
