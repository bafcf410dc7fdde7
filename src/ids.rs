//! Record identifiers
//!
//! The backend issues hyphenated UUIDs. Anything else on the board (mock
//! data, records created locally and not yet confirmed) carries a
//! client-local id and must never reach a move or delete endpoint.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a lead or column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordId {
    /// Issued by the server, kept in the spelling it was issued in
    Persisted(String),
    /// Known only to this client
    Local(String),
}

impl RecordId {
    /// Classifies a raw id. Only the canonical hyphenated form counts as
    /// persisted; simple, braced or URN spellings stay local.
    pub fn parse(raw: &str) -> Self {
        if is_persisted_id(raw) {
            RecordId::Persisted(raw.to_string())
        } else {
            RecordId::Local(raw.to_string())
        }
    }

    /// A fresh placeholder id for an optimistic insert.
    pub fn local() -> Self {
        let n = NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed);
        RecordId::Local(format!("local-{}", n))
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, RecordId::Persisted(_))
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            RecordId::Persisted(raw) => Uuid::parse_str(raw).ok(),
            RecordId::Local(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Persisted(raw) | RecordId::Local(raw) => f.write_str(raw),
        }
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        RecordId::Persisted(uuid.hyphenated().to_string())
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        RecordId::parse(&raw)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        RecordId::parse(raw)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

/// Matches `^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$`,
/// case-insensitively.
pub fn is_persisted_id(raw: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let mut parts = raw.split('-');
    for len in GROUPS {
        match parts.next() {
            Some(part) if part.len() == len && part.bytes().all(|b| b.is_ascii_hexdigit()) => {}
            _ => return false,
        }
    }
    parts.next().is_none()
}
