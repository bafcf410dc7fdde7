//! Activities board
//!
//! Status, priority and assignee are edited inline. Every edit goes
//! through the optimistic editor: the new value shows at once, a badge
//! keyed `"{id}-{field}"` tracks the save, and a refused save puts the last
//! confirmed value back.

mod types;
mod view;

use std::sync::Arc;

use log::{error, info};
use opsboard_optimistic::{MutationKey, Optimistic, Outcome, SaveStatus};
use tokio::sync::Mutex;

use crate::api::{ActivityFieldUpdate, ApiClient};
use crate::config::ClientOptions;
use crate::error::Result;
use crate::feedback::LoadState;
use crate::funnel::DragResult;

pub use types::*;
pub use view::*;

#[derive(Debug, Default)]
struct PageState {
    load: LoadState,
    /// Banner message for the last failed page action
    error: Option<String>,
}

#[derive(Clone)]
pub struct ActivitiesBoard {
    api: ApiClient,
    includes: Vec<String>,
    editor: Optimistic<ActivityList>,
    page: Arc<Mutex<PageState>>,
}

impl ActivitiesBoard {
    pub fn new(api: ApiClient, options: &ClientOptions) -> Self {
        Self {
            api,
            includes: options.activity_includes.clone(),
            editor: Optimistic::new(ActivityList::default(), options.display_windows()),
            page: Arc::new(Mutex::new(PageState::default())),
        }
    }

    /// Loads the activity list with its embedded relations.
    pub async fn load(&self) -> Result<()> {
        {
            let mut page = self.page.lock().await;
            page.load = LoadState::Loading;
            page.error = None;
        }

        match self.api.list_activities(&self.includes).await {
            Ok(activities) => {
                info!("Loaded {} activities", activities.len());
                self.editor
                    .with_store(|list| *list = ActivityList(activities))
                    .await;
                self.page.lock().await.load = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load activities: {}", e);
                let mut page = self.page.lock().await;
                page.load = LoadState::Failed(e.to_string());
                page.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn retry(&self) -> Result<()> {
        self.load().await
    }

    pub async fn load_state(&self) -> LoadState {
        self.page.lock().await.load.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.page.lock().await.error.clone()
    }

    pub async fn activities(&self) -> ActivityList {
        self.editor.with_store(|list| list.clone()).await
    }

    pub async fn activity(&self, id: &str) -> Option<Activity> {
        self.editor.with_store(|list| list.get(id).cloned()).await
    }

    /// The activities passing `filter`, in list order.
    pub async fn filtered(&self, filter: &ActivityFilter) -> Vec<Activity> {
        self.editor
            .with_store(|list| filter.apply(list.as_slice()).into_iter().cloned().collect())
            .await
    }

    /// Saves one field optimistically.
    pub async fn edit_field(&self, id: &str, value: FieldValue) -> Outcome {
        let field = value.field().name();
        let key = MutationKey::new(id, field);
        let update = ActivityFieldUpdate::new(field, value.to_json());
        let api = self.api.clone();
        let id = id.to_string();

        self.editor
            .mutate(key, value, move || async move {
                api.update_activity(&id, &update).await
            })
            .await
    }

    pub async fn set_status(&self, id: &str, status: ActivityStatus) -> Outcome {
        self.edit_field(id, FieldValue::Status(status)).await
    }

    pub async fn set_priority(&self, id: &str, priority: Priority) -> Outcome {
        self.edit_field(id, FieldValue::Priority(priority)).await
    }

    /// `None` leaves the activity unassigned
    pub async fn set_assignee(&self, id: &str, user_id: Option<String>) -> Outcome {
        self.edit_field(id, FieldValue::Assignee(user_id)).await
    }

    /// Turns a card drop on the status board into a status edit.
    ///
    /// Returns `None` when the drop changes nothing: no destination, same
    /// column, a droppable that is not a status column, or an unknown card.
    pub async fn handle_drag_end(&self, result: &DragResult) -> Option<Outcome> {
        let destination = result.destination.as_ref()?;
        if destination.droppable_id == result.source.droppable_id {
            return None;
        }
        let status = ActivityStatus::from_column_id(&destination.droppable_id)?;
        let current = self.activity(&result.draggable_id).await?;
        if current.status == status {
            return None;
        }
        Some(self.set_status(&result.draggable_id, status).await)
    }

    /// Deletes an activity; it leaves the list only once the server agrees.
    pub async fn delete(&self, id: &str) -> Result<()> {
        match self.api.delete_activity(id).await {
            Ok(()) => {
                info!("Deleted activity {}", id);
                self.editor.with_store(|list| list.remove(id)).await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete activity {}: {}", id, e);
                self.page.lock().await.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Badge of one field, if it is showing
    pub async fn status(&self, id: &str, field: ActivityField) -> Option<SaveStatus> {
        self.editor.status(&MutationKey::new(id, field.name())).await
    }

    /// Every badge currently showing
    pub async fn badges(&self) -> Vec<(MutationKey, SaveStatus)> {
        self.editor.badges().await
    }
}
