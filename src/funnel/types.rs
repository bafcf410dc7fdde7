//! Types for the sales funnel board

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Availability of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadStatus {
    #[default]
    Free,
    Occupied,
    Closed,
}

/// A prospect on the funnel.
///
/// `column_id` is `None` while the lead sits in the backlog.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: RecordId,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub data_cadastro: DateTime<Utc>,
    pub column_id: Option<RecordId>,
    pub observacoes: Option<String>,
}

/// A funnel stage. `order` is a sort key only; gaps are fine.
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
    pub id: RecordId,
    pub title: String,
    pub order: i64,
    pub color: Option<String>,
    pub leads: Vec<Lead>,
}

/// Form input for a new lead
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadDraft {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub observacoes: Option<String>,
}

impl LeadDraft {
    pub fn new(nome: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_lead(self, id: RecordId, column_id: Option<RecordId>) -> Lead {
        Lead {
            id,
            nome: self.nome,
            email: self.email,
            telefone: self.telefone,
            status: self.status,
            tags: self.tags,
            data_cadastro: Utc::now(),
            column_id,
            observacoes: self.observacoes,
        }
    }
}

/// Partial update of a lead. Nested options distinguish "leave as is"
/// (`None`) from "clear" (`Some(None)`).
///
/// Setting `id` renames the lead; that is how a placeholder id is swapped
/// for the one the server issued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub id: Option<RecordId>,
    pub nome: Option<String>,
    pub email: Option<Option<String>>,
    pub telefone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub tags: Option<Vec<String>>,
    pub data_cadastro: Option<DateTime<Utc>>,
    pub observacoes: Option<Option<String>>,
}

impl LeadPatch {
    /// A patch that makes a lead equal to `lead` (column placement aside).
    pub fn replace_with(lead: &Lead) -> Self {
        Self {
            id: Some(lead.id.clone()),
            nome: Some(lead.nome.clone()),
            email: Some(lead.email.clone()),
            telefone: Some(lead.telefone.clone()),
            status: Some(lead.status),
            tags: Some(lead.tags.clone()),
            data_cadastro: Some(lead.data_cadastro),
            observacoes: Some(lead.observacoes.clone()),
        }
    }

    pub(crate) fn apply(&self, lead: &mut Lead) {
        if let Some(id) = &self.id {
            lead.id = id.clone();
        }
        if let Some(nome) = &self.nome {
            lead.nome = nome.clone();
        }
        if let Some(email) = &self.email {
            lead.email = email.clone();
        }
        if let Some(telefone) = &self.telefone {
            lead.telefone = telefone.clone();
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(tags) = &self.tags {
            lead.tags = tags.clone();
        }
        if let Some(data_cadastro) = self.data_cadastro {
            lead.data_cadastro = data_cadastro;
        }
        if let Some(observacoes) = &self.observacoes {
            lead.observacoes = observacoes.clone();
        }
    }
}

/// Form input for a new column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDraft {
    pub title: String,
    /// Defaults to the current number of columns, i.e. the far right
    pub order: Option<i64>,
    pub color: Option<String>,
}

/// Partial update of a column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPatch {
    pub id: Option<RecordId>,
    pub title: Option<String>,
    pub order: Option<i64>,
    pub color: Option<Option<String>>,
}

impl ColumnPatch {
    pub(crate) fn apply(&self, column: &mut KanbanColumn) {
        if let Some(id) = &self.id {
            column.id = id.clone();
            for lead in &mut column.leads {
                lead.column_id = Some(id.clone());
            }
        }
        if let Some(title) = &self.title {
            column.title = title.clone();
        }
        if let Some(order) = self.order {
            column.order = order;
        }
        if let Some(color) = &self.color {
            column.color = color.clone();
        }
    }

    /// The patch that undoes `self` on `column`.
    pub(crate) fn inverse(&self, column: &KanbanColumn) -> Self {
        Self {
            id: None,
            title: self.title.as_ref().map(|_| column.title.clone()),
            order: self.order.map(|_| column.order),
            color: self.color.as_ref().map(|_| column.color.clone()),
        }
    }
}

/// Where a lead currently sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadLocation {
    /// `None` for the backlog
    pub column_id: Option<RecordId>,
    pub index: usize,
}
