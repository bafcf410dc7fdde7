//! Types for the signed-in user

use serde::{Deserialize, Serialize};

use crate::directory::SectorRef;
use crate::wire::null_as_default;

/// Profile of the signed-in user, as the dashboard shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
    pub foto_perfil: Option<String>,
    pub telefone: Option<String>,
    pub bio: Option<String>,
    pub setor: Option<SectorRef>,
}

/// Raw `GET /v1/auth/me` payload.
///
/// The backend has used both `name` and `username`, and older accounts may
/// lack a role; [`CurrentUser::from`] settles those differences.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default)]
    pub foto_perfil: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub setor: Option<SectorRef>,
}

impl From<MeResponse> for CurrentUser {
    fn from(me: MeResponse) -> Self {
        let id = match me.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        let name = me
            .name
            .filter(|n| !n.is_empty())
            .or(me.username.filter(|n| !n.is_empty()))
            .unwrap_or_else(|| "Usuário".to_string());
        let role = me.role.filter(|r| !r.is_empty()).unwrap_or_else(|| {
            if me.is_admin {
                "admin".to_string()
            } else {
                "creative_user".to_string()
            }
        });

        Self {
            id,
            name,
            email: me.email.unwrap_or_default(),
            role,
            is_admin: me.is_admin,
            foto_perfil: me.foto_perfil,
            telefone: me.telefone,
            bio: me.bio,
            setor: me.setor,
        }
    }
}
