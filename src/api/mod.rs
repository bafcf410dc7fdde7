//! Typed access to the backend REST API
//!
//! Every call goes through [`ApiClient`], which attaches the session's bearer
//! token and turns non-2xx answers into [`Error::Api`](crate::error::Error::Api)
//! with the server's message already extracted. Response bodies are parsed
//! into the record types of each module; nothing downstream handles raw JSON.

mod activities;
mod columns;
mod leads;
mod notifications;

use reqwest::{Client, Method};

use crate::auth::Session;
use crate::config::{ApiConfig, ClientOptions};
use crate::error::{Error, Result};
use crate::fetch::FetchBuilder;
use crate::ids::RecordId;

pub use activities::ActivityFieldUpdate;
pub use columns::{ColumnOrder, ColumnPayload, ColumnRecord};
pub use leads::{LeadPayload, LeadRecord, MoveLeadRequest};
pub use notifications::NotificationQuery;

/// Endpoint paths, relative to the configured base URL
pub mod endpoints {
    pub const ME: &str = "/v1/auth/me";
    pub const LEADS: &str = "/v1/leads";
    pub const KANBAN_COLUMNS: &str = "/v1/kanban-columns";
    /// Activity routes are still served without the version prefix
    pub const ACTIVITIES: &str = "/atividades";
    pub const USERS_FOR_ASSIGNMENT: &str = "/v1/users/for-assignment";
    pub const PROJECTS: &str = "/projects";
    pub const NOTIFICATIONS: &str = "/v1/notificacoes";
}

/// HTTP client bound to one backend and one session
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(config: ApiConfig, options: &ClientOptions, session: Session) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            config,
            http,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Starts a request carrying the current session token.
    pub(crate) async fn request(&self, method: Method, path: &str) -> Result<FetchBuilder<'_>> {
        let token = self
            .session
            .token()
            .await
            .ok_or_else(|| Error::session("not signed in"))?;
        Ok(self.request_with_token(method, path, &token))
    }

    pub(crate) fn request_with_token(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.http, &self.url(path), method).bearer_auth(token)
    }
}

/// `{base}/{id}` for a server-issued id. Local ids are refused before any
/// request is built.
pub(crate) fn persisted_path(base: &str, id: &RecordId) -> Result<String> {
    if !id.is_persisted() {
        return Err(Error::invalid_input(format!(
            "record '{}' has not been saved yet",
            id
        )));
    }
    Ok(format!("{}/{}", base, id))
}
