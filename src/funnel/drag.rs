//! Translation of drag-and-drop results into board operations

use crate::ids::RecordId;

use super::reducer::LeadMove;

/// Droppable id of the backlog list
pub const BACKLOG: &str = "backlog";
/// Droppable id of the delete zone
pub const TRASH: &str = "trash";

/// A position inside a droppable list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggableLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DraggableLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }

    /// The column this droppable stands for, `None` for the backlog.
    fn column_id(&self) -> Option<RecordId> {
        if self.droppable_id == BACKLOG {
            None
        } else {
            Some(RecordId::parse(&self.droppable_id))
        }
    }
}

/// What the drag-and-drop layer reports when a drag ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragResult {
    pub draggable_id: String,
    pub source: DraggableLocation,
    /// `None` when the card was dropped outside every list
    pub destination: Option<DraggableLocation>,
}

/// What the board should do about a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    Ignore,
    Delete {
        lead_id: RecordId,
    },
    Move {
        mv: LeadMove,
        /// Index in the source list, for undoing the move
        from_index: usize,
        /// Whether the server knows this lead and must be told
        persist: bool,
    },
}

/// Maps a drag result onto a board operation.
///
/// The trash zone wins over everything else. Dropping outside any list, or
/// back onto the exact same slot, does nothing.
pub fn plan_drop(result: &DragResult) -> DropPlan {
    let lead_id = RecordId::parse(&result.draggable_id);

    let Some(destination) = &result.destination else {
        return DropPlan::Ignore;
    };
    if destination.droppable_id == TRASH {
        return DropPlan::Delete { lead_id };
    }
    if destination.droppable_id == result.source.droppable_id
        && destination.index == result.source.index
    {
        return DropPlan::Ignore;
    }

    let persist = lead_id.is_persisted();
    DropPlan::Move {
        mv: LeadMove {
            lead_id,
            from: result.source.column_id(),
            to: destination.column_id(),
            to_index: destination.index,
        },
        from_index: result.source.index,
        persist,
    }
}
