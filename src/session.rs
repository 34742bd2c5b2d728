//! Session lifecycle: startup refresh, login and logout.
//!
//! The controller is driven in two halves so the UI can run the network call as a task:
//! [`SessionController::begin`] decides whether a refresh is due and
//! [`SessionController::complete`] folds its result back in. Login works the same way through
//! [`SessionController::complete_login`].

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{AccessToken, Role, SessionUser, TokenPair};
#[cfg(test)]
use crate::{api::ApiClient, models::Credentials};
use crate::store::{LocalStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Unknown,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// What views and the route guard observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub loading: bool,
}

pub struct SessionController {
    phase: AuthPhase,
    user: Option<SessionUser>,
    store: Arc<dyn LocalStore>,
}

impl SessionController {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { phase: AuthPhase::Unknown, user: None, store }
    }

    #[cfg(test)]
    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            is_authenticated: self.phase == AuthPhase::Authenticated,
            loading: matches!(self.phase, AuthPhase::Unknown | AuthPhase::Checking),
        }
    }

    /// Operator identity, known only after an interactive login.
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Start the startup check. Returns the refresh credential when a refresh request is due.
    ///
    /// Only the first call does anything; the startup check runs once per controller.
    pub fn begin(&mut self) -> Option<String> {
        if self.phase != AuthPhase::Unknown {
            debug!(phase = ?self.phase, "session already started");
            return None;
        }
        match self.store.get(REFRESH_TOKEN_KEY) {
            Some(refresh) if !refresh.is_empty() => {
                self.phase = AuthPhase::Checking;
                debug!("refresh credential found, checking session");
                Some(refresh)
            }
            _ => {
                self.phase = AuthPhase::Unauthenticated;
                info!("no stored session");
                None
            }
        }
    }

    /// Apply the startup refresh result. Ignored unless a check is in flight.
    pub fn complete(&mut self, result: ApiResult<AccessToken>) {
        if self.phase != AuthPhase::Checking {
            warn!(phase = ?self.phase, "refresh result arrived outside a session check, ignored");
            return;
        }
        let persisted = result.and_then(|token| {
            self.store.set(ACCESS_TOKEN_KEY, &token.access)?;
            if let Some(rotated) = &token.refresh {
                self.store.set(REFRESH_TOKEN_KEY, rotated)?;
            }
            Ok(())
        });
        match persisted {
            Ok(()) => {
                self.phase = AuthPhase::Authenticated;
                info!("session restored");
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                self.clear_credentials();
                self.phase = AuthPhase::Unauthenticated;
            }
        }
    }

    #[cfg(test)]
    pub async fn initialize(&mut self, client: &ApiClient) {
        if let Some(refresh) = self.begin() {
            let result = client.refresh_access(&refresh).await;
            self.complete(result);
        }
    }

    /// Apply a login response. On failure the stored credentials are left as they were.
    pub fn complete_login(
        &mut self,
        email: &str,
        role: Role,
        result: ApiResult<TokenPair>,
    ) -> ApiResult<()> {
        let pair = result?;
        self.store.set(ACCESS_TOKEN_KEY, &pair.access)?;
        self.store.set(REFRESH_TOKEN_KEY, &pair.refresh)?;
        self.user = Some(SessionUser::from_login(email, role));
        self.phase = AuthPhase::Authenticated;
        info!(email, role = role.key(), "logged in");
        Ok(())
    }

    #[cfg(test)]
    pub async fn login(
        &mut self,
        client: &ApiClient,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApiResult<()> {
        let credentials = Credentials { email: email.to_string(), password: password.to_string() };
        let result = client.obtain_tokens(&credentials).await;
        self.complete_login(email, role, result)
    }

    pub fn logout(&mut self) {
        self.clear_credentials();
        self.user = None;
        self.phase = AuthPhase::Unauthenticated;
        info!("logged out");
    }

    fn clear_credentials(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %ApiError::from(err), "could not clear credential");
            }
        }
    }
}
