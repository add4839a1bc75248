//! HTTP client adapter for the dashboard REST backend.
//!
//! Single point of outbound request construction: attaches the bearer
//! credential read from the injected store on every call, classifies
//! failures into [`ApiError`] variants, and reacts to 401 responses by
//! clearing persisted credentials and broadcasting
//! [`AuthEvent::SessionExpired`], regardless of which slice issued the
//! request. No retries happen at this layer.

mod error;

pub use error::{
    ApiError, Operation, ACCESS_TOKEN_MISSING, BACKEND_UNREACHABLE, NO_REFRESH_TOKEN,
};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::{ApiConfig, CredentialKey, CredentialStore};

/// Cross-cutting authentication events observed on responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A 401 was received; persisted credentials have been cleared.
    SessionExpired,
}

const AUTH_EVENT_CAPACITY: usize = 16;

/// Thin wrapper over `reqwest` carrying the base URL, the credential store,
/// and the auth-event channel. Cheap to clone; clones share the channel.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    auth_events: broadcast::Sender<AuthEvent>,
}

impl ApiClient {
    /// Build a client for the configured backend.
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(ApiError::Network)?;

        let (auth_events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            auth_events,
        })
    }

    /// Subscribe to authentication events emitted by this client.
    pub fn subscribe_auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.auth_events.subscribe()
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Decode)?;
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(%request_id, method = %method, path, "dispatching request");

        let mut builder = self.http.request(method, &url);
        if let Some(token) = self.credentials.get(CredentialKey::AccessToken) {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%request_id, error = %e, "no response received");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;
        let body = parse_body(&text);

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session(request_id);
        }

        if !status.is_success() {
            tracing::debug!(%request_id, status = status.as_u16(), "request rejected");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(%request_id, status = status.as_u16(), "request fulfilled");
        Ok(body)
    }

    /// Global teardown on 401: clear persisted credentials and notify
    /// subscribers. Clearing twice (e.g. racing a logout) converges on the
    /// same empty state, so the dual-writer race is harmless.
    fn expire_session(&self, request_id: Uuid) {
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(%request_id, error = %e, "failed to clear persisted credentials");
        }
        let _ = self.auth_events.send(AuthEvent::SessionExpired);
        tracing::info!(%request_id, "received 401, session expired");
    }
}

/// Interpret a response body as JSON, keeping non-JSON payloads as strings.
fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Remove one level of `{ "data": ... }` envelope when present.
///
/// Backends answer either with a bare payload or with
/// `{ success, data, message }`; slices apply this once per response.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            removed => {
                if let Some(data) = removed {
                    map.insert("data".to_string(), data);
                }
                Value::Object(map)
            }
        },
        other => other,
    }
}
