//! Notification records

use chrono::{DateTime, Utc};
use opsboard_optimistic::{FieldStore, MutationKey};
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::wire::timestamp_opt;

/// Field name used in badge keys for the read state
pub const STATUS_FIELD: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A nudge about an item's status
    Nudge,
    Info,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub tipo: NotificationKind,
    pub titulo: String,
    pub mensagem: String,
    pub status: NotificationStatus,
    /// Kind of record the notification is about, e.g. `atividade`
    #[serde(default)]
    pub contexto_tipo: Option<String>,
    #[serde(default)]
    pub contexto_id: Option<String>,
    #[serde(default)]
    pub contexto_nome: Option<String>,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub usuario_id: Option<String>,
    #[serde(default)]
    pub from_user_id: Option<String>,
    #[serde(default)]
    pub from_user_name: Option<String>,
    #[serde(default)]
    pub from_user_avatar: Option<String>,
    #[serde(default, deserialize_with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp_opt")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }
}

/// `GET /v1/notificacoes/count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NotificationCount {
    pub total: u64,
    pub unread: u64,
    pub urgent: u64,
}

/// The loaded notifications, addressable by `"{id}-status"` keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationList(pub Vec<Notification>);

impl NotificationList {
    pub fn unread(&self) -> usize {
        self.0.iter().filter(|n| n.is_unread()).count()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Notification> {
        self.0.iter_mut().find(|n| n.id.to_string() == id)
    }
}

impl FieldStore for NotificationList {
    type Value = NotificationStatus;

    fn read(&self, key: &MutationKey) -> Option<NotificationStatus> {
        if key.field() != STATUS_FIELD {
            return None;
        }
        self.0
            .iter()
            .find(|n| n.id.to_string() == key.id())
            .map(|n| n.status)
    }

    fn write(&mut self, key: &MutationKey, value: NotificationStatus) -> bool {
        if key.field() != STATUS_FIELD {
            return false;
        }
        match self.find_mut(key.id()) {
            Some(notification) => {
                notification.status = value;
                true
            }
            None => false,
        }
    }
}
