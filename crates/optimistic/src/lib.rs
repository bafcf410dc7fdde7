//! Optimistic mutation tracking
//!
//! This crate holds the client-side half of an "apply now, confirm later"
//! edit: the value is written to local state before the network call runs,
//! and is either kept or rolled back once the call settles. Each edit is
//! addressed by a [`MutationKey`] (`"{id}-{field}"`) and surfaces a
//! [`SaveStatus`] badge that expires after a display window.
//!
//! Racing edits on the same key are ordered by a per-key generation
//! counter: only the newest edit drives the badge, and a failure rolls back
//! to the newest value the server actually confirmed.

pub mod key;
pub mod ledger;
pub mod mutation;
pub mod status;

pub use key::MutationKey;
pub use ledger::{Ledger, Settlement, Ticket};
pub use mutation::{FieldStore, Optimistic, Outcome};
pub use status::{DisplayWindows, SaveStatus, StatusBoard};
