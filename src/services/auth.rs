//! Authentication state.
//!
//! Session cookies live in the HTTP client's jar; this service tracks who is
//! signed in. The state starts as `Loading` so callers can tell "not checked
//! yet" apart from "checked and anonymous". Logout always lands on
//! `Anonymous`, even when the backend call fails: the local session is gone
//! either way.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::client::AuthApi;
use crate::errors::ServiceError;
use crate::models::Identity;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Bootstrap has not completed yet.
    Loading,
    Authenticated(Identity),
    Anonymous,
}

impl AuthState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

pub struct AuthService {
    api: Arc<dyn AuthApi>,
    state: RwLock<AuthState>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            state: RwLock::new(AuthState::Loading),
        }
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Resolves the initial state from the cookie already in the jar.
    /// An unauthorized or failed check is anonymous, never an error: the
    /// caller's next step is the login screen in both cases.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> AuthState {
        let next = match self.api.me().await {
            Ok(identity) => AuthState::Authenticated(identity),
            Err(ServiceError::Unauthorized) => AuthState::Anonymous,
            Err(err) => {
                warn!(error = %err, "identity check failed; treating as anonymous");
                AuthState::Anonymous
            }
        };
        let mut state = self.state.write().await;
        *state = next.clone();
        next
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ServiceError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::validation("Informe e-mail e senha."));
        }
        self.api.login(email, password).await?;
        // The login response sets the cookie; /auth/me tells us who we are.
        let identity = self.api.me().await?;
        info!(user = %identity.user.email, "signed in");
        let mut state = self.state.write().await;
        *state = AuthState::Authenticated(identity.clone());
        Ok(identity)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "logout request failed; clearing local session anyway");
        }
        let mut state = self.state.write().await;
        *state = AuthState::Anonymous;
    }
}
