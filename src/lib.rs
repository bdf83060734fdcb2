pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod forms;
pub mod models;
pub mod session;
pub mod stats;

use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiClient;
use crate::auth::AuthController;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared state threaded through the CLI: configuration, the session
/// store, the API gateway, and the auth controller that owns the
/// authenticated identity.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
    pub auth: AuthController,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let session = Arc::new(SessionStore::open(&config.storage.data_dir)?);
        let api = Arc::new(ApiClient::new(&config.api, session.clone())?);
        let auth = AuthController::new(api.clone(), session.clone());

        Ok(Self {
            config,
            session,
            api,
            auth,
        })
    }
}
