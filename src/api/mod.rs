//! HTTP gateway to the RidePool backend.
//!
//! One configured client wraps every outbound call: it attaches the bearer
//! credential from the session store when one is present, applies the
//! fixed request timeout, and translates every failure into an [`ApiError`].
//! A 401 from any call clears the session store before surfacing — a single
//! stale token anywhere tears down the whole session.

pub mod error;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dashmap::DashSet;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::models::{
    AuthPayload, CreateTripData, LoginRequest, MessageResponse, RegisterData, SearchTripsData,
    Trip, UpdateProfileData, UpdateTripData, User,
};
use crate::session::SessionStore;

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
    /// Trip ids with a join currently in flight; a duplicate join for the
    /// same trip is rejected locally without touching the network.
    joins_in_flight: DashSet<i64>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            joins_in_flight: DashSet::new(),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "API request");
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.fail(status, &body));
        }

        response.json().await.map_err(|e| {
            ApiError::contract(format!("Response did not match the expected shape: {}", e))
        })
    }

    /// A `null` list body is an empty result set, not an error.
    async fn send_list<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let items: Option<Vec<T>> = self.send(builder).await?;
        Ok(items.unwrap_or_default())
    }

    /// Translate a failure response, applying the global 401 policy.
    fn fail(&self, status: StatusCode, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("Received 401, clearing session");
            self.session.clear();
            return ApiError::unauthorized(body);
        }
        ApiError::server(status.as_u16(), body)
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.request(Method::POST, "/auth/login").json(&body)).await
    }

    pub async fn register(&self, data: &RegisterData) -> Result<AuthPayload, ApiError> {
        self.send(self.request(Method::POST, "/auth/register").json(data)).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.send(self.request(Method::GET, "/auth/me")).await
    }

    // ------------------------------------------------------------------
    // Trips
    // ------------------------------------------------------------------

    pub async fn list_trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.send_list(self.request(Method::GET, "/trips")).await
    }

    /// Trips the authenticated user drives or rides on.
    pub async fn my_trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.send_list(self.request(Method::GET, "/users/trips")).await
    }

    pub async fn create_trip(&self, data: &CreateTripData) -> Result<Trip, ApiError> {
        self.send(self.request(Method::POST, "/trips").json(data)).await
    }

    pub async fn get_trip(&self, id: i64) -> Result<Trip, ApiError> {
        self.send(self.request(Method::GET, &format!("/trips/{}", id))).await
    }

    pub async fn update_trip(&self, id: i64, data: &UpdateTripData) -> Result<Trip, ApiError> {
        self.send(self.request(Method::PUT, &format!("/trips/{}", id)).json(data)).await
    }

    pub async fn delete_trip(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.send(self.request(Method::DELETE, &format!("/trips/{}", id))).await
    }

    pub async fn search_trips(&self, criteria: &SearchTripsData) -> Result<Vec<Trip>, ApiError> {
        self.send_list(self.request(Method::POST, "/trips/search").json(criteria)).await
    }

    /// Join a trip as a passenger. At most one join per trip may be in
    /// flight at a time; the guard releases when the call settles.
    pub async fn join_trip(&self, id: i64) -> Result<MessageResponse, ApiError> {
        if !self.joins_in_flight.insert(id) {
            return Err(ApiError::InFlight(format!(
                "Join request for trip {} is already in progress",
                id
            )));
        }

        let result = self.send(self.request(Method::POST, &format!("/trips/{}/join", id))).await;
        self.joins_in_flight.remove(&id);
        result
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.send(self.request(Method::GET, "/users/profile")).await
    }

    pub async fn update_profile(&self, data: &UpdateProfileData) -> Result<User, ApiError> {
        self.send(self.request(Method::PUT, "/users/profile").json(data)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(dir: &std::path::Path) -> ApiClient {
        let session = Arc::new(SessionStore::open(dir).unwrap());
        ApiClient::new(&ApiConfig::default(), session).unwrap()
    }

    #[test]
    fn test_401_clears_stored_credential() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(dir.path());
        client.session().set_token("stale-token").unwrap();

        let err = client.fail(StatusCode::UNAUTHORIZED, r#"{"error": "token expired"}"#);
        assert!(err.is_unauthorized());
        assert!(client.session().token().is_none());
    }

    #[test]
    fn test_non_401_failure_keeps_credential() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(dir.path());
        client.session().set_token("valid-token").unwrap();

        let err = client.fail(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "Server error: 500");
        assert_eq!(client.session().token().as_deref(), Some("valid-token"));
    }

    #[test]
    fn test_join_guard_rejects_duplicate_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(dir.path());

        assert!(client.joins_in_flight.insert(42));
        // Second attempt while the first is still pending.
        assert!(!client.joins_in_flight.insert(42));

        client.joins_in_flight.remove(&42);
        assert!(client.joins_in_flight.insert(42));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::open(dir.path()).unwrap());
        let config = ApiConfig {
            base_url: "http://localhost:8080/api/v1/".to_string(),
            ..Default::default()
        };
        let client = ApiClient::new(&config, session).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/api/v1");
    }
}
