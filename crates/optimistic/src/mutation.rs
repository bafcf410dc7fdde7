//! The optimistic mutation coordinator

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::sync::Mutex;

use crate::key::MutationKey;
use crate::ledger::Ledger;
use crate::status::{DisplayWindows, SaveStatus, StatusBoard};

/// Local state addressed by [`MutationKey`].
///
/// Implemented by whatever collection backs a screen (a list of
/// activities, an inbox...). `read` returning `None` means the record or
/// field is unknown, which aborts the mutation before anything is written.
pub trait FieldStore: Send {
    type Value: Clone + PartialEq + Send;

    fn read(&self, key: &MutationKey) -> Option<Self::Value>;

    /// Writes the value. Returns `false` if the record disappeared.
    fn write(&mut self, key: &MutationKey, value: Self::Value) -> bool;
}

/// How a mutation ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the value
    Saved,
    /// The server rejected it (or was unreachable); the field was rolled back
    Failed(String),
    /// A newer edit on the same key started before this one settled
    Superseded,
    /// Nothing to edit: the record or field does not exist locally
    UnknownRecord,
}

impl Outcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved)
    }
}

struct Inner<S: FieldStore> {
    store: S,
    ledger: Ledger<S::Value>,
    badges: StatusBoard,
}

/// Applies edits locally, runs the network call, then keeps or reverts.
///
/// Cloning is cheap and every clone shares the same state. The lock is
/// never held while the network call runs, so other keys stay editable.
pub struct Optimistic<S: FieldStore> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S: FieldStore> Clone for Optimistic<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: FieldStore> Optimistic<S> {
    pub fn new(store: S, windows: DisplayWindows) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store,
                ledger: Ledger::new(),
                badges: StatusBoard::new(windows),
            })),
        }
    }

    /// Runs `f` against the backing store, e.g. to replace it after a reload
    /// or to render it.
    pub async fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut inner = self.inner.lock().await;
        f(&mut inner.store)
    }

    pub async fn status(&self, key: &MutationKey) -> Option<SaveStatus> {
        self.inner.lock().await.badges.status(key)
    }

    pub async fn badges(&self) -> Vec<(MutationKey, SaveStatus)> {
        let mut inner = self.inner.lock().await;
        inner.badges.purge_expired();
        inner.badges.snapshot()
    }

    /// Whether any edit on the key is still waiting for the server.
    pub async fn in_flight(&self, key: &MutationKey) -> bool {
        self.inner.lock().await.ledger.in_flight(key)
    }

    /// Performs one optimistic edit.
    ///
    /// The value is written and the key marked saving before `call` is
    /// polled. Errors from `call` are logged and reported through
    /// [`Outcome::Failed`]; they are never propagated.
    pub async fn mutate<T, E, F, Fut>(&self, key: MutationKey, value: S::Value, call: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ticket = {
            let mut inner = self.inner.lock().await;
            let Some(previous) = inner.store.read(&key) else {
                warn!("No local record for {}, skipping edit", key);
                return Outcome::UnknownRecord;
            };
            inner.store.write(&key, value.clone());
            inner.badges.mark_saving(&key);
            inner.ledger.begin(key.clone(), previous, value)
        };
        debug!("Edit {} generation {} in flight", key, ticket.generation());

        let result = call().await;

        let mut inner = self.inner.lock().await;
        let succeeded = result.is_ok();
        let settlement = inner.ledger.settle(ticket, succeeded);

        if let Some(display) = settlement.display {
            if inner.store.read(&key).as_ref() != Some(&display) {
                inner.store.write(&key, display);
            }
        }

        match result {
            Ok(_) if settlement.latest => {
                inner.badges.mark_saved(&key);
                Outcome::Saved
            }
            Err(e) if settlement.latest => {
                error!("Failed to save {}: {}", key, e);
                inner.badges.mark_failed(&key);
                Outcome::Failed(e.to_string())
            }
            Ok(_) => {
                debug!("Edit {} settled after a newer one", key);
                Outcome::Superseded
            }
            Err(e) => {
                warn!("Superseded edit {} failed: {}", key, e);
                Outcome::Superseded
            }
        }
    }
}
