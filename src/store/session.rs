//! Session lifecycle: the authenticate/deauthenticate state machine.
//!
//! The controller owns the session slice and the persisted credentials.
//! Login persists tokens; logout and refresh failure clear them; a 401
//! reported by the HTTP client tears the session down from the outside via
//! [`AuthEvent::SessionExpired`].

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;

use crate::client::{
    unwrap_data, ApiClient, ApiError, AuthEvent, Operation, ACCESS_TOKEN_MISSING, NO_REFRESH_TOKEN,
};
use crate::config::{is_usable_token, CredentialKey, CredentialStore};
use crate::model::UserProfile;

/// Snapshot of the session slice.
///
/// `is_authenticated` is true only while a usable access token is held;
/// `error` carries at most one pending user-facing message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn reject(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    fn reject_anonymous(&mut self, message: String) {
        self.reject(message);
        self.is_authenticated = false;
    }

    fn complete_login(
        &mut self,
        user: Option<UserProfile>,
        access_token: String,
        refresh_token: Option<String>,
    ) {
        self.loading = false;
        self.user = user;
        self.access_token = Some(access_token);
        self.refresh_token = refresh_token;
        self.is_authenticated = true;
        self.error = None;
    }

    fn complete_register(&mut self) {
        // Account created; the caller must still sign in.
        self.loading = false;
        self.error = None;
    }

    fn complete_profile(&mut self, user: UserProfile) {
        self.loading = false;
        self.user = Some(user);
        self.is_authenticated = true;
        self.error = None;
    }

    fn to_anonymous(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.is_authenticated = false;
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TokenPayload {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserProfile>,
}

/// Store driving the session operations.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    client: ApiClient,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionStore {
    pub fn new(client: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            client,
            credentials,
        }
    }

    /// Clone of the current slice state.
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// Restore the session from persisted credentials at process start.
    ///
    /// A usable persisted access token authenticates optimistically without
    /// a network round trip; callers reconcile with [`fetch_profile`]
    /// afterwards.
    ///
    /// [`fetch_profile`]: SessionStore::fetch_profile
    pub fn restore(&self) {
        let access = self
            .credentials
            .get(CredentialKey::AccessToken)
            .map(|token| token.expose().to_string());
        let refresh = self
            .credentials
            .get(CredentialKey::RefreshToken)
            .map(|token| token.expose().to_string());

        match access {
            Some(token) if is_usable_token(&token) => {
                let mut state = self.state.write();
                state.access_token = Some(token);
                state.refresh_token = refresh;
                state.is_authenticated = true;
                tracing::info!("session restored from persisted credentials");
            }
            _ => {
                tracing::debug!("no usable persisted access token, staying anonymous");
            }
        }
    }

    /// Create an account. Success does not authenticate.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        if let Some(message) = validate_registration(full_name, email, password) {
            return Err(self.reject_validation(message));
        }

        self.state.write().begin();

        let request = RegisterRequest {
            full_name,
            email,
            password,
        };
        match self.client.post("/users/register", &request).await {
            Ok(_) => {
                tracing::info!("account registered");
                self.state.write().complete_register();
                Ok(())
            }
            Err(err) => {
                self.state
                    .write()
                    .reject_anonymous(err.user_message(Operation::Register));
                Err(err)
            }
        }
    }

    /// Authenticate and persist the received tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        if let Some(message) = validate_credentials(email, password) {
            return Err(self.reject_validation(message));
        }

        self.state.write().begin();

        match self.perform_login(email, password).await {
            Ok(payload) => {
                tracing::info!("login succeeded");
                // perform_login only returns with a token present.
                let access_token = payload.access_token.unwrap_or_default();
                self.state
                    .write()
                    .complete_login(payload.user, access_token, payload.refresh_token);
                Ok(())
            }
            Err(err) => {
                self.state
                    .write()
                    .reject_anonymous(err.user_message(Operation::Login));
                Err(err)
            }
        }
    }

    async fn perform_login(&self, email: &str, password: &str) -> Result<TokenPayload, ApiError> {
        let body = self
            .client
            .post("/users/login", &LoginRequest { email, password })
            .await?;
        let payload: TokenPayload =
            serde_json::from_value(unwrap_data(body)).map_err(ApiError::Decode)?;

        // A 2xx without a token is still a failed login; nothing is persisted.
        let access_token = payload.access_token.as_deref().unwrap_or_default();
        if access_token.is_empty() {
            return Err(ApiError::Auth(ACCESS_TOKEN_MISSING.to_string()));
        }

        self.persist(CredentialKey::AccessToken, access_token);
        if let Some(refresh_token) = payload.refresh_token.as_deref() {
            self.persist(CredentialKey::RefreshToken, refresh_token);
        }

        Ok(payload)
    }

    /// End the session. The remote call is attempted, but local state and
    /// persisted credentials are cleared unconditionally; a remote failure
    /// is reported without blocking the transition to anonymous.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.state.write().loading = true;

        let result = self.client.post("/users/logout", &json!({})).await;

        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "failed to clear persisted credentials");
        }

        let mut state = self.state.write();
        state.loading = false;
        state.to_anonymous();
        match result {
            Ok(_) => {
                tracing::info!("logged out");
                state.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("remote logout failed, local session cleared anyway");
                state.error = Some(err.user_message(Operation::Logout));
                Err(err)
            }
        }
    }

    /// Exchange the persisted refresh token for a new access token.
    ///
    /// Any failure is fatal: session state and persisted credentials are
    /// cleared.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let refresh_token = self
            .credentials
            .get(CredentialKey::RefreshToken)
            .map(|token| token.expose().to_string())
            .filter(|token| is_usable_token(token));

        let Some(refresh_token) = refresh_token else {
            let err = ApiError::Auth(NO_REFRESH_TOKEN.to_string());
            self.fail_refresh(&err);
            return Err(err);
        };

        match self.perform_refresh(&refresh_token).await {
            Ok(access_token) => {
                tracing::info!("access token refreshed");
                self.state.write().access_token = Some(access_token);
                Ok(())
            }
            Err(err) => {
                self.fail_refresh(&err);
                Err(err)
            }
        }
    }

    async fn perform_refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let body = self
            .client
            .post("/users/refresh-token", &RefreshRequest { refresh_token })
            .await?;
        let payload: TokenPayload =
            serde_json::from_value(unwrap_data(body)).map_err(ApiError::Decode)?;

        let access_token = payload.access_token.unwrap_or_default();
        if access_token.is_empty() {
            return Err(ApiError::Auth(ACCESS_TOKEN_MISSING.to_string()));
        }

        self.persist(CredentialKey::AccessToken, &access_token);
        Ok(access_token)
    }

    fn fail_refresh(&self, err: &ApiError) {
        tracing::warn!("token refresh failed, clearing session");
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "failed to clear persisted credentials");
        }
        let mut state = self.state.write();
        state.to_anonymous();
        state.error = Some(err.user_message(Operation::RefreshToken));
    }

    /// Fetch the current identity for the persisted session.
    pub async fn fetch_profile(&self) -> Result<(), ApiError> {
        self.state.write().begin();

        let result = self.client.get("/users/profile").await.and_then(|body| {
            serde_json::from_value::<UserProfile>(unwrap_data(body)).map_err(ApiError::Decode)
        });

        match result {
            Ok(user) => {
                self.state.write().complete_profile(user);
                Ok(())
            }
            Err(err) => {
                self.state
                    .write()
                    .reject(err.user_message(Operation::FetchProfile));
                Err(err)
            }
        }
    }

    /// Spawn a task resetting the session to anonymous whenever the HTTP
    /// client reports a 401, regardless of which slice issued the request.
    pub fn watch_session_expiry(&self) -> JoinHandle<()> {
        let mut events = self.client.subscribe_auth_events();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SessionExpired) => {
                        tracing::info!("session expired, resetting to anonymous");
                        state.write().to_anonymous();
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn reject_validation(&self, message: &str) -> ApiError {
        self.state.write().error = Some(message.to_string());
        ApiError::Validation(message.to_string())
    }

    fn persist(&self, key: CredentialKey, value: &str) {
        if let Err(e) = self.credentials.set(key, value) {
            tracing::warn!(error = %e, key = key.name(), "failed to persist credential");
        }
    }
}

/// Pre-flight validation for login; checked before any network call.
fn validate_credentials(email: &str, password: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        return Some("Email is required");
    }
    if password.is_empty() {
        return Some("Password is required");
    }
    None
}

/// Pre-flight validation for registration.
fn validate_registration(full_name: &str, email: &str, password: &str) -> Option<&'static str> {
    if full_name.trim().is_empty() {
        return Some("Full name is required");
    }
    validate_credentials(email, password)
}
