//! Small reference records shared by several screens: projects, users and
//! sectors, plus the lists that feed the assignment selectors.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::{endpoints, ApiClient};
use crate::error::Result;
use crate::wire::string_or_number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nome: String,
}

/// An entry of the assignee selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignableUser {
    pub id: String,
    /// `name`, else `username`, else the e-mail address
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct AssignableUserRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: String,
}

impl From<AssignableUserRecord> for AssignableUser {
    fn from(record: AssignableUserRecord) -> Self {
        let name = record
            .name
            .filter(|n| !n.is_empty())
            .or(record.username.filter(|n| !n.is_empty()))
            .unwrap_or_else(|| record.email.clone());
        Self {
            id: record.id,
            name,
            email: record.email,
        }
    }
}

impl ApiClient {
    /// Users that can be picked as an activity's assignee
    pub async fn assignable_users(&self) -> Result<Vec<AssignableUser>> {
        let records: Vec<AssignableUserRecord> = self
            .request(Method::GET, endpoints::USERS_FOR_ASSIGNMENT)
            .await?
            .execute()
            .await?;
        Ok(records.into_iter().map(AssignableUser::from).collect())
    }

    pub async fn projects(&self) -> Result<Vec<ProjectRef>> {
        self.request(Method::GET, endpoints::PROJECTS)
            .await?
            .execute()
            .await
    }
}
