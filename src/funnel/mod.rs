//! Sales funnel board
//!
//! [`FunnelBoard`] owns the client copy of the funnel (columns plus
//! backlog), applies every user action to it right away and mirrors the
//! change to the backend. When the backend refuses, the local change is
//! undone and an error toast is queued.
//!
//! Records without a server id (mock data, inserts still waiting for the
//! server) are handled locally and never reach a move or delete endpoint.

mod drag;
mod reducer;
mod types;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use crate::api::{ApiClient, ColumnOrder, ColumnPayload, LeadPayload, MoveLeadRequest};
use crate::error::{Error, Result};
use crate::feedback::{LoadState, Toast};
use crate::ids::RecordId;

pub use drag::{plan_drop, DragResult, DraggableLocation, DropPlan, BACKLOG, TRASH};
pub use reducer::{Action, BoardState, LeadMove};
pub use types::*;

/// Result of handling a finished drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing to do
    Ignored,
    /// Moved and confirmed by the server
    Moved,
    /// Moved locally; the lead has no server id
    MovedLocally,
    /// The server refused the move, which was undone
    Reverted(String),
    Deleted,
    /// The server refused the delete; the lead was put back
    DeleteFailed(String),
}

#[derive(Default)]
struct FunnelInner {
    state: BoardState,
    load: LoadState,
    toasts: Vec<Toast>,
}

impl FunnelInner {
    fn toast_error(&mut self, title: &str, err: &Error) {
        self.toasts.push(Toast::error(title, err));
    }
}

/// The funnel page's state and the actions it offers.
///
/// Cloning is cheap; clones share the same board.
#[derive(Clone)]
pub struct FunnelBoard {
    api: ApiClient,
    inner: Arc<Mutex<FunnelInner>>,
}

impl FunnelBoard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(FunnelInner::default())),
        }
    }

    /// A board seeded with local data and no backend round trip.
    pub fn with_state(api: ApiClient, state: BoardState) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(FunnelInner {
                state,
                load: LoadState::Ready,
                toasts: Vec::new(),
            })),
        }
    }

    pub async fn snapshot(&self) -> BoardState {
        self.inner.lock().await.state.clone()
    }

    pub async fn load_state(&self) -> LoadState {
        self.inner.lock().await.load.clone()
    }

    /// Drains the queued toasts
    pub async fn take_toasts(&self) -> Vec<Toast> {
        std::mem::take(&mut self.inner.lock().await.toasts)
    }

    /// Applies an action locally without talking to the backend.
    pub async fn dispatch(&self, action: Action) {
        self.inner.lock().await.state.apply(action);
    }

    /// Fetches columns and leads concurrently and distributes the leads.
    ///
    /// If only one of the two requests succeeds the board is still built
    /// from it: columns with their embedded leads, or the backlog alone. An
    /// error is returned only when both fail.
    pub async fn load(&self) -> Result<()> {
        self.inner.lock().await.load = LoadState::Loading;

        let (columns, leads) = tokio::join!(self.api.list_columns(), self.api.list_leads());

        let mut inner = self.inner.lock().await;
        match (columns, leads) {
            (Ok(columns), Ok(leads)) => {
                let mut columns: Vec<KanbanColumn> = columns
                    .into_iter()
                    .map(|record| KanbanColumn {
                        leads: Vec::new(),
                        ..KanbanColumn::from(record)
                    })
                    .collect();
                let slots: HashMap<RecordId, usize> = columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (c.id.clone(), i))
                    .collect();

                let mut backlog = Vec::new();
                for lead in leads.into_iter().map(Lead::from) {
                    match lead.column_id.as_ref().and_then(|id| slots.get(id)) {
                        Some(&slot) => columns[slot].leads.push(lead),
                        None => {
                            if let Some(id) = &lead.column_id {
                                warn!("Lead {} points at unknown column {}", lead.id, id);
                            }
                            backlog.push(Lead {
                                column_id: None,
                                ..lead
                            });
                        }
                    }
                }

                info!(
                    "Loaded {} columns and {} leads",
                    columns.len(),
                    backlog.len() + columns.iter().map(|c| c.leads.len()).sum::<usize>()
                );
                inner.state.apply(Action::SetColumns(columns));
                inner.state.apply(Action::SetBacklog(backlog));
                inner.load = LoadState::Ready;
                Ok(())
            }
            (Ok(columns), Err(e)) => {
                warn!("Leads failed to load, using embedded column leads: {}", e);
                let columns = columns.into_iter().map(KanbanColumn::from).collect();
                inner.state.apply(Action::SetColumns(columns));
                inner.toast_error("Erro ao carregar leads", &e);
                inner.load = LoadState::Ready;
                Ok(())
            }
            (Err(e), Ok(leads)) => {
                warn!("Columns failed to load, showing the backlog only: {}", e);
                let backlog = leads
                    .into_iter()
                    .map(Lead::from)
                    .filter(|lead| lead.column_id.is_none())
                    .collect();
                inner.state.apply(Action::SetBacklog(backlog));
                inner.toast_error("Erro ao carregar colunas", &e);
                inner.load = LoadState::Ready;
                Ok(())
            }
            (Err(e), Err(_)) => {
                error!("Failed to load the funnel: {}", e);
                inner.load = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Same as [`FunnelBoard::load`]; offered next to a failed load's banner.
    pub async fn retry(&self) -> Result<()> {
        self.load().await
    }

    /// Carries out the drop the drag-and-drop layer reported.
    pub async fn handle_drag_end(&self, result: &DragResult) -> DragOutcome {
        match plan_drop(result) {
            DropPlan::Ignore => DragOutcome::Ignored,
            DropPlan::Delete { lead_id } => match self.delete_lead(&lead_id).await {
                Ok(()) => DragOutcome::Deleted,
                Err(e) => DragOutcome::DeleteFailed(e.to_string()),
            },
            DropPlan::Move {
                mv,
                from_index,
                persist,
            } => self.move_lead(mv, from_index, persist).await,
        }
    }

    async fn move_lead(&self, mv: LeadMove, from_index: usize, persist: bool) -> DragOutcome {
        {
            let mut inner = self.inner.lock().await;
            let before = inner.state.locate(&mv.lead_id);
            inner.state.apply(Action::MoveLead(mv.clone()));
            let after = inner.state.locate(&mv.lead_id);
            if before == after {
                debug!("Drop of {} changed nothing", mv.lead_id);
                return DragOutcome::Ignored;
            }
        }

        if !persist {
            debug!("Lead {} has no server id, move kept local", mv.lead_id);
            return DragOutcome::MovedLocally;
        }

        let request = MoveLeadRequest {
            column_id: mv.to.clone(),
            new_index: mv.to_index,
        };
        match self.api.move_lead(&mv.lead_id, &request).await {
            Ok(()) => DragOutcome::Moved,
            Err(e) => {
                error!("Failed to move lead {}: {}", mv.lead_id, e);
                let mut inner = self.inner.lock().await;
                inner.state.apply(Action::MoveLead(mv.inverse(from_index)));
                inner.toast_error("Erro ao mover lead", &e);
                DragOutcome::Reverted(e.to_string())
            }
        }
    }

    /// Adds a lead to a column (or the backlog when `column_id` is `None` or
    /// unknown) and creates it on the server.
    ///
    /// The lead shows up at once under a placeholder id, which is swapped for
    /// the server's id when the create succeeds. Returns the server id.
    pub async fn create_lead(&self, draft: LeadDraft, column_id: Option<RecordId>) -> Result<RecordId> {
        let placeholder = RecordId::local();
        let payload = {
            let mut inner = self.inner.lock().await;
            inner
                .state
                .apply(Action::AddLead(draft.into_lead(placeholder.clone(), column_id)));
            let lead = inner
                .state
                .lead(&placeholder)
                .ok_or_else(|| Error::not_found(&placeholder))?;
            LeadPayload {
                data_cadastro: Some(lead.data_cadastro),
                ..LeadPayload::from(lead)
            }
        };

        match self.api.create_lead(&payload).await {
            Ok(record) => {
                let id = record.id.clone();
                debug!("Lead {} confirmed as {}", placeholder, id);
                let confirmed = Lead::from(record);
                self.dispatch(Action::UpdateLead {
                    id: placeholder,
                    patch: LeadPatch::replace_with(&confirmed),
                })
                .await;
                Ok(id)
            }
            Err(e) => {
                error!("Failed to create lead: {}", e);
                let mut inner = self.inner.lock().await;
                inner.state.apply(Action::DeleteLead(placeholder));
                inner.toast_error("Erro ao salvar lead", &e);
                Err(e)
            }
        }
    }

    /// Applies a partial edit and saves the whole lead. Restores the
    /// previous version if the save fails.
    pub async fn update_lead(&self, id: &RecordId, patch: LeadPatch) -> Result<()> {
        let patch = LeadPatch { id: None, ..patch };
        let (previous, payload) = {
            let mut inner = self.inner.lock().await;
            let previous = inner
                .state
                .lead(id)
                .cloned()
                .ok_or_else(|| Error::not_found(id))?;
            inner.state.apply(Action::UpdateLead {
                id: id.clone(),
                patch,
            });
            let payload = inner.state.lead(id).map(LeadPayload::from);
            (previous, payload)
        };

        let Some(payload) = payload.filter(|_| id.is_persisted()) else {
            return Ok(());
        };

        match self.api.update_lead(id, &payload).await {
            Ok(record) => {
                let patch = LeadPatch {
                    id: Some(record.id.clone()),
                    data_cadastro: record.registered_at(),
                    ..LeadPatch::default()
                };
                self.dispatch(Action::UpdateLead {
                    id: id.clone(),
                    patch,
                })
                .await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to update lead {}: {}", id, e);
                let mut inner = self.inner.lock().await;
                inner.state.apply(Action::UpdateLead {
                    id: id.clone(),
                    patch: LeadPatch::replace_with(&previous),
                });
                inner.toast_error("Erro ao salvar lead", &e);
                Err(e)
            }
        }
    }

    /// Removes a lead. Leads without a server id are only removed locally;
    /// otherwise a refused delete puts the lead back where it was.
    pub async fn delete_lead(&self, id: &RecordId) -> Result<()> {
        let (lead, location) = {
            let mut inner = self.inner.lock().await;
            let location = inner.state.locate(id).ok_or_else(|| Error::not_found(id))?;
            let lead = inner.state.lead(id).cloned().ok_or_else(|| Error::not_found(id))?;
            inner.state.apply(Action::DeleteLead(id.clone()));
            (lead, location)
        };

        if !id.is_persisted() {
            debug!("Lead {} removed locally", id);
            return Ok(());
        }

        match self.api.delete_lead(id).await {
            Ok(()) => {
                info!("Deleted lead {}", id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete lead {}: {}", id, e);
                let mut inner = self.inner.lock().await;
                inner.state.restore_lead(lead, &location);
                inner.toast_error("Erro ao excluir lead", &e);
                Err(e)
            }
        }
    }

    /// Adds a column, by default at the far right, and creates it on the
    /// server. Returns the server id.
    pub async fn create_column(&self, draft: ColumnDraft) -> Result<RecordId> {
        let placeholder = RecordId::local();
        let payload = {
            let mut inner = self.inner.lock().await;
            let order = draft
                .order
                .unwrap_or_else(|| inner.state.columns.len() as i64);
            let column = KanbanColumn {
                id: placeholder.clone(),
                title: draft.title,
                order,
                color: draft.color,
                leads: Vec::new(),
            };
            let payload = ColumnPayload::from(&column);
            inner.state.apply(Action::AddColumn(column));
            payload
        };

        match self.api.create_column(&payload).await {
            Ok(record) => {
                let id = record.id.clone();
                let patch = ColumnPatch {
                    id: Some(record.id),
                    title: Some(record.title),
                    order: Some(record.order),
                    color: Some(record.color),
                };
                self.dispatch(Action::UpdateColumn {
                    id: placeholder,
                    patch,
                })
                .await;
                Ok(id)
            }
            Err(e) => {
                error!("Failed to create column: {}", e);
                let mut inner = self.inner.lock().await;
                inner.state.apply(Action::DeleteColumn(placeholder));
                inner.toast_error("Erro ao salvar coluna", &e);
                Err(e)
            }
        }
    }

    pub async fn update_column(&self, id: &RecordId, patch: ColumnPatch) -> Result<()> {
        let patch = ColumnPatch { id: None, ..patch };
        let (undo, payload) = {
            let mut inner = self.inner.lock().await;
            let before = inner.state.column(id).ok_or_else(|| Error::not_found(id))?;
            let undo = patch.inverse(before);
            inner.state.apply(Action::UpdateColumn {
                id: id.clone(),
                patch,
            });
            let payload = inner.state.column(id).map(ColumnPayload::from);
            (undo, payload)
        };

        let Some(payload) = payload.filter(|_| id.is_persisted()) else {
            return Ok(());
        };

        if let Err(e) = self.api.update_column(id, &payload).await {
            error!("Failed to update column {}: {}", id, e);
            let mut inner = self.inner.lock().await;
            inner.state.apply(Action::UpdateColumn {
                id: id.clone(),
                patch: undo,
            });
            inner.toast_error("Erro ao salvar coluna", &e);
            return Err(e);
        }
        Ok(())
    }

    /// Deletes a column. Its leads move to the end of the backlog; a refused
    /// delete brings the column and its leads back.
    pub async fn delete_column(&self, id: &RecordId) -> Result<()> {
        let column = {
            let mut inner = self.inner.lock().await;
            let column = inner
                .state
                .column(id)
                .cloned()
                .ok_or_else(|| Error::not_found(id))?;
            inner.state.apply(Action::DeleteColumn(id.clone()));
            column
        };

        if !id.is_persisted() {
            return Ok(());
        }

        match self.api.delete_column(id).await {
            Ok(()) => {
                info!("Deleted column {} ({} leads to backlog)", id, column.leads.len());
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete column {}: {}", id, e);
                let mut inner = self.inner.lock().await;
                inner.state.restore_column(column);
                inner.toast_error("Erro ao excluir coluna", &e);
                Err(e)
            }
        }
    }

    /// Reorders columns (listed ids first, in that order) and saves the new
    /// order of every persisted column in one request.
    pub async fn reorder_columns(&self, ids: Vec<RecordId>) -> Result<()> {
        let (previous, orders) = {
            let mut inner = self.inner.lock().await;
            let previous: Vec<(RecordId, i64)> = inner
                .state
                .columns
                .iter()
                .map(|c| (c.id.clone(), c.order))
                .collect();
            inner.state.apply(Action::ReorderColumns(ids));
            let orders: Vec<ColumnOrder> = inner
                .state
                .columns
                .iter()
                .filter(|c| c.id.is_persisted())
                .map(|c| ColumnOrder {
                    id: c.id.clone(),
                    order: c.order,
                })
                .collect();
            (previous, orders)
        };

        if orders.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.api.reorder_columns(&orders).await {
            error!("Failed to reorder columns: {}", e);
            let mut inner = self.inner.lock().await;
            for (id, order) in previous {
                inner.state.apply(Action::UpdateColumn {
                    id,
                    patch: ColumnPatch {
                        order: Some(order),
                        ..ColumnPatch::default()
                    },
                });
            }
            inner.toast_error("Erro ao reordenar colunas", &e);
            return Err(e);
        }
        Ok(())
    }
}
