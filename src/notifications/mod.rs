//! Notification inbox

mod types;

use std::sync::Arc;

use log::{debug, error, info, warn};
use opsboard_optimistic::{FieldStore, MutationKey, Optimistic, Outcome};
use tokio::sync::Mutex;

use crate::api::{ApiClient, NotificationQuery};
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::feedback::{LoadState, Toast};
use crate::ids::RecordId;

pub use types::*;

#[derive(Debug, Default)]
struct InboxPage {
    load: LoadState,
    counts: NotificationCount,
    toasts: Vec<Toast>,
}

/// The signed-in user's notifications.
#[derive(Clone)]
pub struct Inbox {
    api: ApiClient,
    store: Optimistic<NotificationList>,
    page: Arc<Mutex<InboxPage>>,
}

impl Inbox {
    pub fn new(api: ApiClient, options: &ClientOptions) -> Self {
        Self {
            api,
            store: Optimistic::new(NotificationList::default(), options.display_windows()),
            page: Arc::new(Mutex::new(InboxPage::default())),
        }
    }

    /// Reloads the list and the counters together. A counter failure is
    /// only logged; a list failure is returned.
    pub async fn refresh(&self, query: &NotificationQuery) -> Result<()> {
        self.page.lock().await.load = LoadState::Loading;

        let (list, counts) = tokio::join!(
            self.api.list_notifications(query),
            self.api.notification_count()
        );

        let mut page = self.page.lock().await;
        match counts {
            Ok(counts) => page.counts = counts,
            Err(e) => warn!("Failed to load notification counters: {}", e),
        }
        match list {
            Ok(list) => {
                info!("Loaded {} notifications", list.len());
                self.store
                    .with_store(|store| *store = NotificationList(list))
                    .await;
                page.load = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load notifications: {}", e);
                page.load = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.store.with_store(|store| store.0.clone()).await
    }

    /// Unread notifications among the loaded ones
    pub async fn unread(&self) -> usize {
        self.store.with_store(|store| store.unread()).await
    }

    /// Counters as last reported by the server, adjusted for local actions
    pub async fn counts(&self) -> NotificationCount {
        self.page.lock().await.counts
    }

    pub async fn load_state(&self) -> LoadState {
        self.page.lock().await.load.clone()
    }

    pub async fn take_toasts(&self) -> Vec<Toast> {
        std::mem::take(&mut self.page.lock().await.toasts)
    }

    /// Marks one notification read, optimistically.
    ///
    /// A notification that is not unread is left alone: no request is sent
    /// and the counters do not move.
    pub async fn mark_read(&self, id: &RecordId) -> Outcome {
        let key = MutationKey::new(id.to_string(), STATUS_FIELD);
        let current = self.store.with_store(|store| store.read(&key)).await;
        match current {
            None => return Outcome::UnknownRecord,
            Some(NotificationStatus::Unread) => {}
            Some(status) => {
                debug!("Notification {} is already {:?}", id, status);
                return Outcome::Saved;
            }
        }

        let api = self.api.clone();
        let target = id.clone();
        let outcome = self
            .store
            .mutate(key, NotificationStatus::Read, move || async move {
                api.mark_notification_read(&target).await
            })
            .await;

        if outcome.is_saved() {
            let mut page = self.page.lock().await;
            page.counts.unread = page.counts.unread.saturating_sub(1);
        }
        outcome
    }

    /// Marks everything read. Restores the previous read states if the
    /// server refuses.
    pub async fn mark_all_read(&self) -> Result<()> {
        let previous = self
            .store
            .with_store(|store| {
                let previous: Vec<_> = store.0.iter().map(|n| (n.id.clone(), n.status)).collect();
                for n in store.0.iter_mut().filter(|n| n.is_unread()) {
                    n.status = NotificationStatus::Read;
                }
                previous
            })
            .await;

        match self.api.mark_all_notifications_read().await {
            Ok(()) => {
                self.page.lock().await.counts.unread = 0;
                Ok(())
            }
            Err(e) => {
                error!("Failed to mark notifications as read: {}", e);
                self.store
                    .with_store(|store| {
                        for (id, status) in previous {
                            if let Some(n) = store.0.iter_mut().find(|n| n.id == id) {
                                n.status = status;
                            }
                        }
                    })
                    .await;
                self.page
                    .lock()
                    .await
                    .toasts
                    .push(Toast::error("Erro ao marcar notificações", &e));
                Err(e)
            }
        }
    }

    /// Removes a notification, putting it back if the server refuses.
    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        let removed = self
            .store
            .with_store(|store| {
                let pos = store.0.iter().position(|n| &n.id == id)?;
                Some((pos, store.0.remove(pos)))
            })
            .await;
        let Some((pos, notification)) = removed else {
            return Err(Error::not_found(id));
        };

        match self.api.delete_notification(id).await {
            Ok(()) => {
                let mut page = self.page.lock().await;
                page.counts.total = page.counts.total.saturating_sub(1);
                if notification.is_unread() {
                    page.counts.unread = page.counts.unread.saturating_sub(1);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete notification {}: {}", id, e);
                self.store
                    .with_store(|store| {
                        let pos = pos.min(store.0.len());
                        store.0.insert(pos, notification);
                    })
                    .await;
                self.page
                    .lock()
                    .await
                    .toasts
                    .push(Toast::error("Erro ao excluir notificação", &e));
                Err(e)
            }
        }
    }
}
