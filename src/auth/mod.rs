//! Session lifecycle: startup resolution, login, register, logout.
//!
//! The controller owns the authenticated identity for the rest of the
//! application. It starts in `Resolving`, settles once the stored
//! credential has been checked, and only ever changes state through the
//! named operations here.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::{ApiClient, ApiError};
use crate::models::{AuthPayload, RegisterData, User};
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Resolving,
    Authenticated(User),
}

pub struct AuthController {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    state: RwLock<AuthState>,
}

impl AuthController {
    /// A fresh controller is `Resolving` until [`resolve`](Self::resolve)
    /// settles the stored credential.
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: RwLock::new(AuthState::Resolving),
        }
    }

    /// Startup check. No stored token settles immediately; a stored token
    /// is verified against the backend, and any failure (expired, invalid,
    /// unreachable) tears the session down rather than leaving a broken
    /// credential around.
    pub async fn resolve(&self) -> AuthState {
        let token = match self.session.token() {
            Some(token) => token,
            None => {
                *self.state.write() = AuthState::Unauthenticated;
                return AuthState::Unauthenticated;
            }
        };

        // A token that is already expired (or undecodable) will only
        // bounce off the backend; drop it without the round-trip.
        if SessionStore::is_expired(&token) {
            if let Some(hint) = SessionStore::identity_hint(&token) {
                tracing::debug!(email = ?hint.email, "Stored token expired");
            }
            self.session.clear();
            *self.state.write() = AuthState::Unauthenticated;
            return AuthState::Unauthenticated;
        }

        match self.api.current_user().await {
            Ok(user) => {
                tracing::debug!(user = %user.email, "Restored session");
                *self.state.write() = AuthState::Authenticated(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Stored credential rejected");
                self.session.clear();
                *self.state.write() = AuthState::Unauthenticated;
            }
        }
        self.state()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let payload = self.api.login(email, password).await?;
        self.accept(payload, "login")
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        let payload = self.api.register(data).await?;
        self.accept(payload, "registration")
    }

    /// Enforce the auth contract: a success response must carry both a
    /// token and a user, or nothing is stored and no state changes.
    fn accept(&self, payload: AuthPayload, operation: &str) -> Result<User, ApiError> {
        let (token, user) = match (payload.token, payload.user) {
            (Some(token), Some(user)) if !token.is_empty() => (token, user),
            _ => {
                return Err(ApiError::contract(format!(
                    "Incomplete {} response from server",
                    operation
                )))
            }
        };

        self.session
            .set_token(&token)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        *self.state.write() = AuthState::Authenticated(user.clone());
        Ok(user)
    }

    /// Clear the credential and identity. Idempotent; returning the user
    /// to the login entry point is the caller's concern.
    pub fn logout(&self) {
        self.session.clear();
        *self.state.write() = AuthState::Unauthenticated;
    }

    pub fn current_user(&self) -> Option<User> {
        match &*self.state.read() {
            AuthState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(*self.state.read(), AuthState::Resolving)
    }

    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::models::trip::test_support::sample_user;

    fn controller(dir: &std::path::Path) -> AuthController {
        let session = Arc::new(SessionStore::open(dir).unwrap());
        let api = Arc::new(ApiClient::new(&ApiConfig::default(), session.clone()).unwrap());
        AuthController::new(api, session)
    }

    #[test]
    fn test_starts_resolving() {
        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());
        assert!(auth.is_resolving());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_resolve_without_token_settles_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());
        assert_eq!(tokio_test::block_on(auth.resolve()), AuthState::Unauthenticated);
        assert!(!auth.is_resolving());
    }

    #[test]
    fn test_resolve_drops_expired_token_locally() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;
        use chrono::{Duration, Utc};

        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());

        let claims = serde_json::json!({
            "exp": (Utc::now() - Duration::hours(1)).timestamp(),
            "email": "asha@example.com",
        });
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        auth.session.set_token(&format!("h.{}.s", payload)).unwrap();

        assert_eq!(tokio_test::block_on(auth.resolve()), AuthState::Unauthenticated);
        assert!(auth.session.token().is_none());
    }

    #[test]
    fn test_accept_missing_user_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());

        let payload = AuthPayload {
            token: Some("tok-123".to_string()),
            user: None,
        };
        let err = auth.accept(payload, "login").unwrap_err();
        assert!(matches!(err, ApiError::Contract(_)));
        assert!(auth.session.token().is_none());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_accept_missing_token_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());

        let payload = AuthPayload {
            token: None,
            user: Some(sample_user(1)),
        };
        assert!(auth.accept(payload, "login").is_err());
        assert!(auth.session.token().is_none());
    }

    #[test]
    fn test_accept_complete_payload_authenticates() {
        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());

        let payload = AuthPayload {
            token: Some("tok-123".to_string()),
            user: Some(sample_user(1)),
        };
        let user = auth.accept(payload, "login").unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(auth.session.token().as_deref(), Some("tok-123"));
        assert_eq!(auth.current_user().map(|u| u.id), Some(1));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let auth = controller(dir.path());

        let payload = AuthPayload {
            token: Some("tok-123".to_string()),
            user: Some(sample_user(1)),
        };
        auth.accept(payload, "login").unwrap();

        auth.logout();
        assert!(auth.current_user().is_none());
        assert!(auth.session.token().is_none());

        auth.logout();
        assert_eq!(auth.state(), AuthState::Unauthenticated);
    }
}
