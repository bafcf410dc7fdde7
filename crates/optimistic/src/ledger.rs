//! Per-key generation ledger
//!
//! Requests are never cancelled, so two edits to the same key can settle in
//! any order. The ledger numbers edits per key and remembers the newest
//! value the server confirmed, so a late response from an older edit can
//! neither overwrite a newer edit nor resurrect a value the server rejected.

use std::collections::HashMap;

use crate::key::MutationKey;

/// Receipt for one started edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<V> {
    key: MutationKey,
    generation: u64,
    value: V,
}

impl<V> Ticket<V> {
    pub fn key(&self) -> &MutationKey {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The value this edit wrote optimistically
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// What to do once an edit settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement<V> {
    /// Value the field must show now. `None` while a newer edit is still in flight.
    pub display: Option<V>,
    /// Whether this edit was the newest one for its key. Only the newest
    /// edit updates the badge.
    pub latest: bool,
}

#[derive(Debug)]
struct Track<V> {
    latest: u64,
    latest_settled: bool,
    pending: usize,
    confirmed: V,
    confirmed_generation: u64,
}

/// Generation bookkeeping for every key with an edit in flight.
#[derive(Debug)]
pub struct Ledger<V> {
    tracks: HashMap<MutationKey, Track<V>>,
}

impl<V> Default for Ledger<V> {
    fn default() -> Self {
        Self {
            tracks: HashMap::new(),
        }
    }
}

impl<V: Clone> Ledger<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new edit.
    ///
    /// `previous` is the value shown before the edit. It becomes the
    /// rollback baseline only when no other edit on the key is in flight;
    /// otherwise the existing baseline is kept.
    pub fn begin(&mut self, key: MutationKey, previous: V, value: V) -> Ticket<V> {
        let track = self.tracks.entry(key.clone()).or_insert_with(|| Track {
            latest: 0,
            latest_settled: false,
            pending: 0,
            confirmed: previous,
            confirmed_generation: 0,
        });
        track.latest += 1;
        track.latest_settled = false;
        track.pending += 1;

        Ticket {
            key,
            generation: track.latest,
            value,
        }
    }

    /// Records the result of an edit and says what the field should show.
    pub fn settle(&mut self, ticket: Ticket<V>, succeeded: bool) -> Settlement<V> {
        let Ticket {
            key,
            generation,
            value,
        } = ticket;

        let Some(track) = self.tracks.get_mut(&key) else {
            return Settlement {
                display: None,
                latest: false,
            };
        };

        track.pending = track.pending.saturating_sub(1);
        if succeeded && generation > track.confirmed_generation {
            track.confirmed = value;
            track.confirmed_generation = generation;
        }

        let latest = generation == track.latest;
        if latest {
            track.latest_settled = true;
        }

        let display = track.latest_settled.then(|| track.confirmed.clone());

        if track.pending == 0 {
            self.tracks.remove(&key);
        }

        Settlement { display, latest }
    }

    /// Whether any edit on the key is still in flight.
    pub fn in_flight(&self, key: &MutationKey) -> bool {
        self.tracks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
