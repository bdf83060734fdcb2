//! Bearer credential storage and token introspection.
//!
//! The store is the single source of truth for the credential: it keeps an
//! in-memory copy behind a lock and persists it to a token file under the
//! data directory so a session survives process restarts. It never talks
//! to the network; expiry checking only inspects the token's own claims.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;

const TOKEN_FILE: &str = "token";

/// Claims the client reads out of a bearer token payload.
///
/// Signature verification is the server's job; the client only inspects
/// the expiry and identity hints.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Partial identity recovered from token claims without a network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHint {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub name: Option<String>,
}

pub struct SessionStore {
    path: PathBuf,
    token: RwLock<Option<String>>,
}

impl SessionStore {
    /// Open the store rooted at `data_dir`, loading any persisted token.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(TOKEN_FILE);
        let token = match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read token file: {}", path.display()))
            }
        };

        Ok(Self {
            path,
            token: RwLock::new(token),
        })
    }

    /// The stored credential, if any. Does not validate expiry.
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Persist a credential for subsequent requests; survives restarts.
    pub fn set_token(&self, token: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        fs::write(&self.path, token)
            .with_context(|| format!("Failed to write token file: {}", self.path.display()))?;
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    /// Remove the credential. Idempotent: a missing token file is fine.
    pub fn clear(&self) {
        *self.token.write() = None;
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove token file: {}", e);
            }
        }
    }

    /// Whether the token's `exp` claim lies in the past. Fail-closed: a
    /// token the client cannot decode counts as expired.
    pub fn is_expired(token: &str) -> bool {
        match decode_claims(token) {
            Some(claims) => claims.exp < Utc::now().timestamp(),
            None => true,
        }
    }

    /// Identity claims embedded in the token, `None` on any decode failure.
    pub fn identity_hint(token: &str) -> Option<IdentityHint> {
        decode_claims(token).map(|claims| IdentityHint {
            id: claims.user_id,
            email: claims.email,
            name: claims.name,
        })
    }
}

fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Build an unsigned JWT-shaped token with the given claims payload.
    fn make_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_token_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = SessionStore::open(dir.path()).unwrap();
        assert!(store.token().is_none());
        store.set_token("tok-123").unwrap();
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        drop(store);

        let reopened = SessionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();

        store.set_token("tok-123").unwrap();
        store.clear();
        assert!(store.token().is_none());

        // Second clear with no file present must not fail.
        store.clear();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_is_expired_for_future_and_past_exp() {
        let future = make_token(serde_json::json!({
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        }));
        assert!(!SessionStore::is_expired(&future));

        let past = make_token(serde_json::json!({
            "exp": (Utc::now() - Duration::hours(1)).timestamp(),
        }));
        assert!(SessionStore::is_expired(&past));
    }

    #[test]
    fn test_is_expired_fails_closed() {
        assert!(SessionStore::is_expired(""));
        assert!(SessionStore::is_expired("not-a-token"));
        assert!(SessionStore::is_expired("a.b.c"));

        // Valid base64 but no exp claim.
        let no_exp = make_token(serde_json::json!({"user_id": 1}));
        assert!(SessionStore::is_expired(&no_exp));
    }

    #[test]
    fn test_identity_hint() {
        let token = make_token(serde_json::json!({
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "user_id": 42,
            "email": "asha@example.com",
            "name": "Asha Rao",
        }));

        let hint = SessionStore::identity_hint(&token).unwrap();
        assert_eq!(hint.id, Some(42));
        assert_eq!(hint.email.as_deref(), Some("asha@example.com"));
        assert_eq!(hint.name.as_deref(), Some("Asha Rao"));

        assert!(SessionStore::identity_hint("garbage").is_none());
    }
}
