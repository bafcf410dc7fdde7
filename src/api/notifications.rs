//! Notification endpoints

use reqwest::Method;

use crate::error::Result;
use crate::ids::RecordId;
use crate::notifications::{Notification, NotificationCount};
use crate::wire::valid_rows;

use super::{endpoints, persisted_path, ApiClient};

/// Paging and filtering for `GET /v1/notificacoes`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub unread_only: bool,
}

impl NotificationQuery {
    pub fn unread() -> Self {
        Self {
            unread_only: true,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }
}

impl ApiClient {
    pub async fn list_notifications(&self, query: &NotificationQuery) -> Result<Vec<Notification>> {
        let mut request = self.request(Method::GET, endpoints::NOTIFICATIONS).await?;
        if let Some(skip) = query.skip {
            request = request.query("skip", skip.to_string());
        }
        if let Some(limit) = query.limit {
            request = request.query("limit", limit.to_string());
        }
        if query.unread_only {
            request = request.query("apenas_nao_lidas", "true");
        }
        let rows: Vec<serde_json::Value> = request.execute().await?;
        Ok(valid_rows(rows, "notification"))
    }

    pub async fn notification_count(&self) -> Result<NotificationCount> {
        let path = format!("{}/count", endpoints::NOTIFICATIONS);
        self.request(Method::GET, &path).await?.execute().await
    }

    pub async fn mark_notification_read(&self, id: &RecordId) -> Result<Notification> {
        let path = format!("{}/read", persisted_path(endpoints::NOTIFICATIONS, id)?);
        self.request(Method::PATCH, &path).await?.execute().await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        let path = format!("{}/read-all", endpoints::NOTIFICATIONS);
        self.request(Method::POST, &path)
            .await?
            .execute_unit()
            .await
    }

    pub async fn delete_notification(&self, id: &RecordId) -> Result<()> {
        let path = persisted_path(endpoints::NOTIFICATIONS, id)?;
        self.request(Method::DELETE, &path)
            .await?
            .execute_unit()
            .await
    }
}
