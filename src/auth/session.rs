//! Session state shared by every request

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

use super::types::CurrentUser;

/// Where the session is in its lifecycle.
///
/// `Verifying` holds a restored token that has not been checked yet;
/// `Refreshing` re-checks an already verified one. Both still carry their
/// token so requests keep working while the check runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Verifying {
        token: String,
    },
    Authenticated {
        token: String,
        user: CurrentUser,
    },
    Refreshing {
        token: String,
        user: CurrentUser,
    },
}

impl SessionState {
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Verifying { token }
            | SessionState::Authenticated { token, .. }
            | SessionState::Refreshing { token, .. } => Some(token),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            SessionState::Authenticated { user, .. } | SessionState::Refreshing { user, .. } => {
                Some(user)
            }
            _ => None,
        }
    }
}

/// How a token check ended
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verification {
    Accepted(CurrentUser),
    /// The server refused the token
    Rejected,
    /// The server could not be asked
    Unreachable,
}

/// Handle to the session. Clones share state; pass it explicitly to
/// whatever needs a token instead of reaching for a global.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    /// A signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// A session restored from a persisted token, pending verification
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Verifying {
                token: token.into(),
            })),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token().map(str::to_string)
    }

    pub async fn user(&self) -> Option<CurrentUser> {
        self.state.read().await.user().cloned()
    }

    /// Stores the result of a successful login.
    pub async fn sign_in(&self, token: impl Into<String>, user: CurrentUser) {
        info!("Signed in as {}", user.email);
        *self.state.write().await = SessionState::Authenticated {
            token: token.into(),
            user,
        };
    }

    /// Applies a profile edit to the cached user. Returns `false` when
    /// nobody is signed in.
    pub async fn update_user(&self, edit: impl FnOnce(&mut CurrentUser)) -> bool {
        let mut state = self.state.write().await;
        match &mut *state {
            SessionState::Authenticated { user, .. } | SessionState::Refreshing { user, .. } => {
                edit(user);
                true
            }
            _ => false,
        }
    }

    pub async fn sign_out(&self) {
        info!("Signed out");
        *self.state.write().await = SessionState::Anonymous;
    }

    /// Moves into the checking state and hands back the token to check.
    pub(crate) async fn begin_verification(&self) -> Option<String> {
        let mut state = self.state.write().await;
        let next = match &*state {
            SessionState::Anonymous => return None,
            SessionState::Verifying { token } => SessionState::Verifying {
                token: token.clone(),
            },
            SessionState::Authenticated { token, user } | SessionState::Refreshing { token, user } => {
                SessionState::Refreshing {
                    token: token.clone(),
                    user: user.clone(),
                }
            }
        };
        let token = next.token().map(str::to_string);
        *state = next;
        token
    }

    /// Settles a check started by [`Session::begin_verification`]. Results
    /// for a token that was replaced in the meantime are dropped.
    pub(crate) async fn finish_verification(&self, checked: &str, verification: Verification) {
        let mut state = self.state.write().await;
        if state.token() != Some(checked) {
            debug!("Session changed during verification, ignoring result");
            return;
        }

        let next = match (verification, &*state) {
            (Verification::Accepted(user), _) => SessionState::Authenticated {
                token: checked.to_string(),
                user,
            },
            (Verification::Rejected, _) => SessionState::Anonymous,
            (Verification::Unreachable, SessionState::Refreshing { token, user }) => {
                SessionState::Authenticated {
                    token: token.clone(),
                    user: user.clone(),
                }
            }
            (Verification::Unreachable, _) => SessionState::Anonymous,
        };
        *state = next;
    }
}
