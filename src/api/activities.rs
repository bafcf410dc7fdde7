//! Activity endpoints

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::activities::Activity;
use crate::error::Result;
use crate::wire::valid_rows;

use super::{endpoints, ApiClient};

/// Body of `PUT /atividades/{id}`: a single `{field: value}` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActivityFieldUpdate(Map<String, Value>);

impl ActivityFieldUpdate {
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        let mut map = Map::new();
        map.insert(field.into(), value);
        Self(map)
    }

    /// The field being written
    pub fn field(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }
}

fn activity_path(id: &str) -> String {
    format!("{}/{}", endpoints::ACTIVITIES, id)
}

impl ApiClient {
    /// Lists activities, asking the backend to embed the given relations.
    pub async fn list_activities(&self, includes: &[String]) -> Result<Vec<Activity>> {
        let mut request = self.request(Method::GET, endpoints::ACTIVITIES).await?;
        if !includes.is_empty() {
            request = request.query("include", includes.join(","));
        }
        let rows: Vec<Value> = request.execute().await?;
        Ok(valid_rows(rows, "activity"))
    }

    pub async fn update_activity(&self, id: &str, update: &ActivityFieldUpdate) -> Result<()> {
        self.request(Method::PUT, &activity_path(id))
            .await?
            .json(update)?
            .execute_unit()
            .await
    }

    pub async fn delete_activity(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &activity_path(id))
            .await?
            .execute_unit()
            .await
    }
}
