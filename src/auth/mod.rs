//! Session handling and the signed-in user
//!
//! Login and registration happen elsewhere; this module only carries the
//! bearer token and checks it against the backend.

mod session;
mod types;

use log::warn;

use crate::api::{endpoints, ApiClient};
use crate::error::{Error, Result};

pub use session::*;
pub use types::*;

impl ApiClient {
    /// Checks the session token with `GET /v1/auth/me`.
    ///
    /// On success the session becomes authenticated with the returned
    /// profile. A rejected token signs the session out. If the backend is
    /// unreachable an already authenticated session is kept, while an
    /// unverified restored token is dropped.
    pub async fn verify_session(&self) -> Result<CurrentUser> {
        let session = self.session();
        let token = session
            .begin_verification()
            .await
            .ok_or_else(|| Error::session("no token to verify"))?;

        let result = self
            .request_with_token(reqwest::Method::GET, endpoints::ME, &token)
            .execute::<MeResponse>()
            .await
            .map(CurrentUser::from);

        let verification = match &result {
            Ok(user) => Verification::Accepted(user.clone()),
            Err(e) if e.is_unauthorized() => Verification::Rejected,
            Err(e) => {
                warn!("Could not verify session: {}", e);
                Verification::Unreachable
            }
        };
        session.finish_verification(&token, verification).await;
        result
    }
}
