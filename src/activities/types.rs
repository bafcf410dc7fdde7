//! Activity records and their editable fields

use std::fmt;

use chrono::{DateTime, Utc};
use opsboard_optimistic::{FieldStore, MutationKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::directory::{ProjectRef, SectorRef, UserRef};
use crate::wire::{null_as_default, string_or_number, string_or_number_opt, timestamp_opt};

/// Read case-insensitively; written with the exact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ActivityStatus {
    #[serde(rename = "Não iniciada")]
    NotStarted,
    #[serde(rename = "Em andamento")]
    InProgress,
    #[serde(rename = "Concluída")]
    Done,
    #[serde(rename = "Atrasada")]
    Late,
}

impl ActivityStatus {
    /// Board order
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::NotStarted,
        ActivityStatus::InProgress,
        ActivityStatus::Done,
        ActivityStatus::Late,
    ];

    /// The label the backend stores
    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::NotStarted => "Não iniciada",
            ActivityStatus::InProgress => "Em andamento",
            ActivityStatus::Done => "Concluída",
            ActivityStatus::Late => "Atrasada",
        }
    }

    /// Droppable id of the status column on the activities board
    pub fn column_id(self) -> &'static str {
        match self {
            ActivityStatus::NotStarted => "nao-iniciada",
            ActivityStatus::InProgress => "em-andamento",
            ActivityStatus::Done => "concluida",
            ActivityStatus::Late => "atrasada",
        }
    }

    pub fn from_column_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.column_id() == id)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.label().to_lowercase() == raw)
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("unknown activity status '{}'", raw))
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    Baixa,
    #[default]
    #[serde(rename = "Média")]
    Media,
    Alta,
    Urgente,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Baixa => "Baixa",
            Priority::Media => "Média",
            Priority::Alta => "Alta",
            Priority::Urgente => "Urgente",
        }
    }

    /// Accepts any letter case, and "Media" without the accent.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "baixa" => Some(Priority::Baixa),
            "média" | "media" => Some(Priority::Media),
            "alta" => Some(Priority::Alta),
            "urgente" => Some(Priority::Urgente),
            _ => None,
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("unknown priority '{}'", raw))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An activity as listed with `include=responsavel,setor,projeto`.
///
/// The nested `projeto`, `responsavel` and `setor` summaries reflect the
/// last load; inline edits only touch the flat fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Activity {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub status: ActivityStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prioridade: Priority,
    #[serde(default, alias = "projetoId", deserialize_with = "string_or_number_opt")]
    pub projeto_id: Option<String>,
    #[serde(default, alias = "responsavelId", deserialize_with = "string_or_number_opt")]
    pub responsavel_id: Option<String>,
    #[serde(default, alias = "setorId", deserialize_with = "string_or_number_opt")]
    pub setor_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp_opt")]
    pub prazo: Option<DateTime<Utc>>,
    #[serde(default, alias = "dataInicio", deserialize_with = "timestamp_opt")]
    pub data_inicio: Option<DateTime<Utc>>,
    #[serde(default, alias = "dataFim", deserialize_with = "timestamp_opt")]
    pub data_fim: Option<DateTime<Utc>>,
    #[serde(default)]
    pub percentual_conclusao: Option<f64>,
    #[serde(default)]
    pub projeto: Option<ProjectRef>,
    #[serde(default)]
    pub responsavel: Option<UserRef>,
    #[serde(default)]
    pub setor: Option<SectorRef>,
    #[serde(default, alias = "createdAt", deserialize_with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", deserialize_with = "timestamp_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Activity {
    /// Project name, or `""` when the project was not embedded
    pub fn project_name(&self) -> &str {
        self.projeto.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }
}

/// Fields that can be edited inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityField {
    Status,
    Priority,
    Assignee,
}

impl ActivityField {
    /// Name of the field on the wire, also used in badge keys
    pub fn name(self) -> &'static str {
        match self {
            ActivityField::Status => "status",
            ActivityField::Priority => "prioridade",
            ActivityField::Assignee => "responsavel_id",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "status" => Some(ActivityField::Status),
            "prioridade" => Some(ActivityField::Priority),
            "responsavel_id" => Some(ActivityField::Assignee),
            _ => None,
        }
    }
}

/// A value of one of the [`ActivityField`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Status(ActivityStatus),
    Priority(Priority),
    Assignee(Option<String>),
}

impl FieldValue {
    pub fn field(&self) -> ActivityField {
        match self {
            FieldValue::Status(_) => ActivityField::Status,
            FieldValue::Priority(_) => ActivityField::Priority,
            FieldValue::Assignee(_) => ActivityField::Assignee,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Status(status) => Value::from(status.label()),
            FieldValue::Priority(priority) => Value::from(priority.label()),
            FieldValue::Assignee(Some(id)) => Value::from(id.as_str()),
            FieldValue::Assignee(None) => Value::Null,
        }
    }

    fn read(activity: &Activity, field: ActivityField) -> Self {
        match field {
            ActivityField::Status => FieldValue::Status(activity.status),
            ActivityField::Priority => FieldValue::Priority(activity.prioridade),
            ActivityField::Assignee => FieldValue::Assignee(activity.responsavel_id.clone()),
        }
    }

    fn write(self, activity: &mut Activity) {
        match self {
            FieldValue::Status(status) => activity.status = status,
            FieldValue::Priority(priority) => activity.prioridade = priority,
            FieldValue::Assignee(id) => activity.responsavel_id = id,
        }
    }
}

/// The loaded activities, addressable by `"{id}-{field}"` keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityList(pub Vec<Activity>);

impl ActivityList {
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.0.iter().find(|a| a.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Activity> {
        let pos = self.0.iter().position(|a| a.id == id)?;
        Some(self.0.remove(pos))
    }

    pub fn as_slice(&self) -> &[Activity] {
        &self.0
    }
}

impl FieldStore for ActivityList {
    type Value = FieldValue;

    fn read(&self, key: &MutationKey) -> Option<FieldValue> {
        let field = ActivityField::parse(key.field())?;
        self.get(key.id()).map(|a| FieldValue::read(a, field))
    }

    fn write(&mut self, key: &MutationKey, value: FieldValue) -> bool {
        if ActivityField::parse(key.field()) != Some(value.field()) {
            return false;
        }
        match self.0.iter_mut().find(|a| a.id == key.id()) {
            Some(activity) => {
                value.write(activity);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Activity {
        serde_json::from_value(json!({
            "id": 7,
            "nome": "Roteiro do vídeo",
            "status": "Não iniciada",
            "prioridade": null,
            "projeto_id": 3,
            "projeto": {"id": 3, "name": "Campanha Verão"},
            "prazo": "2024-05-10",
            "created_at": "2024-05-01T09:00:00.000000"
        }))
        .unwrap()
    }

    #[test]
    fn parses_backend_activity() {
        let activity = sample();
        assert_eq!(activity.id, "7");
        assert_eq!(activity.prioridade, Priority::Media);
        assert_eq!(activity.projeto_id.as_deref(), Some("3"));
        assert_eq!(activity.project_name(), "Campanha Verão");
        assert!(activity.prazo.is_some());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_value::<Activity>(json!({
            "id": "a1",
            "nome": "X",
            "status": "Pausada"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn labels_are_read_in_any_case() {
        let activity: Activity = serde_json::from_value(json!({
            "id": 9,
            "nome": "Briefing",
            "status": "em andamento",
            "prioridade": "alta"
        }))
        .unwrap();
        assert_eq!(activity.status, ActivityStatus::InProgress);
        assert_eq!(activity.prioridade, Priority::Alta);
        assert_eq!(Priority::parse("MEDIA"), Some(Priority::Media));
        assert_eq!(ActivityStatus::parse("NÃO INICIADA"), Some(ActivityStatus::NotStarted));
        assert_eq!(serde_json::to_value(Priority::Media).unwrap(), json!("Média"));
    }

    #[test]
    fn status_column_ids_round_trip() {
        for status in ActivityStatus::ALL {
            assert_eq!(ActivityStatus::from_column_id(status.column_id()), Some(status));
        }
        assert_eq!(ActivityStatus::from_column_id("arquivada"), None);
    }

    #[test]
    fn store_reads_and_writes_by_key() {
        let mut list = ActivityList(vec![sample()]);
        let key = MutationKey::new("7", "prioridade");
        assert_eq!(list.read(&key), Some(FieldValue::Priority(Priority::Media)));
        assert!(list.write(&key, FieldValue::Priority(Priority::Urgente)));
        assert_eq!(list.0[0].prioridade, Priority::Urgente);

        // Value of the wrong field is refused
        assert!(!list.write(&key, FieldValue::Status(ActivityStatus::Done)));
        assert_eq!(list.read(&MutationKey::new("7", "descricao")), None);
        assert_eq!(list.read(&MutationKey::new("8", "status")), None);
    }

    #[test]
    fn field_values_serialize_like_the_backend_expects() {
        assert_eq!(FieldValue::Status(ActivityStatus::Done).to_json(), json!("Concluída"));
        assert_eq!(FieldValue::Assignee(None).to_json(), Value::Null);
    }
}
