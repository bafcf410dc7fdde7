//! opsboard
//!
//! Client-side core of an operations dashboard: a sales funnel kanban, an
//! activities board with inline editing and a notification inbox, all
//! backed by a REST API. Local state is updated optimistically and
//! reconciled with the server; see the `opsboard-optimistic` crate for the
//! mutation primitive.

pub mod activities;
pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod feedback;
pub mod fetch;
pub mod funnel;
pub mod ids;
pub mod notifications;
pub mod wire;

use crate::activities::ActivitiesBoard;
use crate::api::ApiClient;
use crate::auth::{CurrentUser, Session};
use crate::config::{ApiConfig, ClientOptions};
use crate::funnel::FunnelBoard;
use crate::notifications::Inbox;

pub use crate::error::{Error, Result};
pub use opsboard_optimistic as optimistic;

/// The main entry point: one backend, one session, and the boards on top.
pub struct Opsboard {
    api: ApiClient,
    options: ClientOptions,
}

impl Opsboard {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the REST API, e.g. `http://localhost:3001/api`
    /// * `token` - A previously issued bearer token, if any
    ///
    /// # Example
    ///
    /// ```no_run
    /// use opsboard::Opsboard;
    ///
    /// # async fn run() -> opsboard::Result<()> {
    /// let opsboard = Opsboard::new("http://localhost:3001/api", Some("token".into()))?;
    /// opsboard.verify_session().await?;
    /// let funnel = opsboard.funnel();
    /// funnel.load().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        Self::new_with_options(api_url, token, ClientOptions::default())
    }

    /// Create a new client with custom options
    pub fn new_with_options(
        api_url: &str,
        token: Option<String>,
        options: ClientOptions,
    ) -> Result<Self> {
        Self::from_config(ApiConfig::new(api_url, token)?, options)
    }

    pub fn from_config(config: ApiConfig, options: ClientOptions) -> Result<Self> {
        let session = match &config.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        };
        let api = ApiClient::new(config, &options, session)?;
        Ok(Self { api, options })
    }

    /// Reads the configuration from `OPSBOARD_API_URL` and
    /// `OPSBOARD_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ApiConfig::from_env()?, ClientOptions::default())
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Checks the session token against the backend.
    pub async fn verify_session(&self) -> Result<CurrentUser> {
        self.api.verify_session().await
    }

    /// A fresh, empty funnel board; call [`FunnelBoard::load`] to fill it.
    pub fn funnel(&self) -> FunnelBoard {
        FunnelBoard::new(self.api.clone())
    }

    pub fn activities(&self) -> ActivitiesBoard {
        ActivitiesBoard::new(self.api.clone(), &self.options)
    }

    pub fn inbox(&self) -> Inbox {
        Inbox::new(self.api.clone(), &self.options)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::activities::{ActivitiesBoard, ActivityFilter, ActivityStatus, Priority};
    pub use crate::auth::{CurrentUser, Session, SessionState};
    pub use crate::config::{ApiConfig, ClientOptions};
    pub use crate::error::{Error, Result};
    pub use crate::feedback::{LoadState, Toast};
    pub use crate::funnel::{DragOutcome, DragResult, DraggableLocation, FunnelBoard};
    pub use crate::ids::RecordId;
    pub use crate::notifications::Inbox;
    pub use crate::Opsboard;
    pub use opsboard_optimistic::{Outcome, SaveStatus};
}
