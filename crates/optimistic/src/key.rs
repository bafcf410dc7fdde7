//! Mutation keys

use std::fmt;

/// Identifies one editable field of one record.
///
/// Renders as `"{id}-{field}"`, which is also how save badges are looked up
/// by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationKey {
    id: String,
    field: String,
}

impl MutationKey {
    pub fn new(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
        }
    }

    /// The record identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The field (or operation) name
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.field)
    }
}
