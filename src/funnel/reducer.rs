//! Pure state transitions of the funnel board

use log::debug;

use crate::ids::RecordId;

use super::types::{ColumnPatch, KanbanColumn, Lead, LeadLocation, LeadPatch};

/// Move of one lead between lists. `None` stands for the backlog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadMove {
    pub lead_id: RecordId,
    pub from: Option<RecordId>,
    pub to: Option<RecordId>,
    pub to_index: usize,
}

impl LeadMove {
    /// The move that puts the lead back where it was before `self`.
    pub fn inverse(&self, from_index: usize) -> LeadMove {
        LeadMove {
            lead_id: self.lead_id.clone(),
            from: self.to.clone(),
            to: self.from.clone(),
            to_index: from_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetColumns(Vec<KanbanColumn>),
    SetBacklog(Vec<Lead>),
    MoveLead(LeadMove),
    /// Appends to the column named by `lead.column_id`, or to the backlog
    AddLead(Lead),
    UpdateLead { id: RecordId, patch: LeadPatch },
    DeleteLead(RecordId),
    AddColumn(KanbanColumn),
    UpdateColumn { id: RecordId, patch: ColumnPatch },
    /// Removes the column; its leads go to the end of the backlog
    DeleteColumn(RecordId),
    /// Puts the listed columns first, in that order, and renumbers every
    /// column's `order` from zero
    ReorderColumns(Vec<RecordId>),
}

/// The funnel's client state: ordered columns plus the backlog.
///
/// Every lead lives in exactly one of these lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub columns: Vec<KanbanColumn>,
    pub backlog: Vec<Lead>,
}

impl BoardState {
    pub fn new(columns: Vec<KanbanColumn>, backlog: Vec<Lead>) -> Self {
        let mut state = Self { columns, backlog };
        state.sort_columns();
        state
    }

    /// Returns the state after `action`, leaving `self` untouched.
    pub fn reduce(&self, action: Action) -> Self {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    /// Applies `action` in place. Actions naming records that are not on
    /// the board do nothing.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetColumns(columns) => {
                self.columns = columns;
                self.sort_columns();
            }
            Action::SetBacklog(backlog) => self.backlog = backlog,
            Action::MoveLead(mv) => self.move_lead(mv),
            Action::AddLead(lead) => self.add_lead(lead),
            Action::UpdateLead { id, patch } => {
                if let Some(lead) = self.lead_mut(&id) {
                    patch.apply(lead);
                }
            }
            Action::DeleteLead(id) => {
                self.take_lead(&id);
            }
            Action::AddColumn(column) => {
                self.columns.push(column);
                self.sort_columns();
            }
            Action::UpdateColumn { id, patch } => {
                if let Some(column) = self.columns.iter_mut().find(|c| c.id == id) {
                    patch.apply(column);
                    self.sort_columns();
                }
            }
            Action::DeleteColumn(id) => {
                if let Some(pos) = self.columns.iter().position(|c| c.id == id) {
                    let column = self.columns.remove(pos);
                    self.backlog.extend(column.leads.into_iter().map(|mut lead| {
                        lead.column_id = None;
                        lead
                    }));
                }
            }
            Action::ReorderColumns(ids) => self.reorder_columns(&ids),
        }
    }

    pub fn column(&self, id: &RecordId) -> Option<&KanbanColumn> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn lead(&self, id: &RecordId) -> Option<&Lead> {
        self.columns
            .iter()
            .flat_map(|c| c.leads.iter())
            .chain(self.backlog.iter())
            .find(|l| &l.id == id)
    }

    /// Where the lead currently sits, if anywhere.
    pub fn locate(&self, id: &RecordId) -> Option<LeadLocation> {
        if let Some(index) = self.backlog.iter().position(|l| &l.id == id) {
            return Some(LeadLocation {
                column_id: None,
                index,
            });
        }
        self.columns.iter().find_map(|column| {
            column
                .leads
                .iter()
                .position(|l| &l.id == id)
                .map(|index| LeadLocation {
                    column_id: Some(column.id.clone()),
                    index,
                })
        })
    }

    /// Total number of leads on the board
    pub fn lead_count(&self) -> usize {
        self.backlog.len() + self.columns.iter().map(|c| c.leads.len()).sum::<usize>()
    }

    /// Puts a removed lead back at its old position. Falls back to the end
    /// of the backlog when its column is gone.
    pub(crate) fn restore_lead(&mut self, mut lead: Lead, at: &LeadLocation) {
        if self.locate(&lead.id).is_some() {
            return;
        }
        let column_id = at
            .column_id
            .clone()
            .filter(|id| self.columns.iter().any(|c| &c.id == id));
        let index = if column_id == at.column_id {
            at.index
        } else {
            usize::MAX
        };
        lead.column_id = column_id.clone();
        if let Some(list) = self.list_mut(column_id.as_ref()) {
            let index = index.min(list.len());
            list.insert(index, lead);
        }
    }

    /// Brings back a deleted column, pulling its former leads out of
    /// wherever they went in the meantime.
    pub(crate) fn restore_column(&mut self, mut column: KanbanColumn) {
        if self.column(&column.id).is_some() {
            return;
        }
        let former: Vec<RecordId> = column.leads.drain(..).map(|l| l.id).collect();
        for id in former {
            if let Some(mut lead) = self.take_lead(&id) {
                lead.column_id = Some(column.id.clone());
                column.leads.push(lead);
            }
        }
        self.columns.push(column);
        self.sort_columns();
    }

    fn list_mut(&mut self, column_id: Option<&RecordId>) -> Option<&mut Vec<Lead>> {
        match column_id {
            None => Some(&mut self.backlog),
            Some(id) => self
                .columns
                .iter_mut()
                .find(|c| &c.id == id)
                .map(|c| &mut c.leads),
        }
    }

    fn lead_mut(&mut self, id: &RecordId) -> Option<&mut Lead> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.leads.iter_mut())
            .chain(self.backlog.iter_mut())
            .find(|l| &l.id == id)
    }

    fn take_lead(&mut self, id: &RecordId) -> Option<Lead> {
        let location = self.locate(id)?;
        let list = self.list_mut(location.column_id.as_ref())?;
        Some(list.remove(location.index))
    }

    fn move_lead(&mut self, mv: LeadMove) {
        // The destination must exist before anything is removed, otherwise
        // the lead would end up in no list at all.
        if self.list_mut(mv.to.as_ref()).is_none() {
            debug!("Move of {} to unknown column ignored", mv.lead_id);
            return;
        }
        let Some(source) = self.list_mut(mv.from.as_ref()) else {
            return;
        };
        let Some(index) = source.iter().position(|l| l.id == mv.lead_id) else {
            debug!("Lead {} not at move source, ignoring", mv.lead_id);
            return;
        };
        let mut lead = source.remove(index);
        lead.column_id = mv.to.clone();

        if let Some(target) = self.list_mut(mv.to.as_ref()) {
            let at = mv.to_index.min(target.len());
            target.insert(at, lead);
        }
    }

    fn add_lead(&mut self, mut lead: Lead) {
        let known_column = lead
            .column_id
            .as_ref()
            .is_some_and(|id| self.columns.iter().any(|c| &c.id == id));
        if !known_column {
            lead.column_id = None;
        }
        if let Some(list) = self.list_mut(lead.column_id.clone().as_ref()) {
            list.push(lead);
        }
    }

    fn reorder_columns(&mut self, ids: &[RecordId]) {
        let mut ordered = Vec::with_capacity(self.columns.len());
        for id in ids {
            if let Some(pos) = self.columns.iter().position(|c| &c.id == id) {
                ordered.push(self.columns.remove(pos));
            }
        }
        ordered.append(&mut self.columns);
        for (order, column) in ordered.iter_mut().enumerate() {
            column.order = order as i64;
        }
        self.columns = ordered;
    }

    fn sort_columns(&mut self) {
        self.columns.sort_by_key(|c| c.order);
    }
}
