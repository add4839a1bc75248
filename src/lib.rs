//! Client-side state core for a financial dashboard.
//!
//! The crate models the asynchronous data-fetching layer of a dashboard
//! frontend as a set of state slices over a REST backend:
//!
//! ```text
//! view ──→ SessionStore / FinancialStore ──→ ApiClient ──→ backend
//!   ↑              │ (slice state)               │
//!   └── snapshot ──┘                 AuthEvent ──┘ (401 teardown)
//! ```
//!
//! - [`client`] wraps the outbound HTTP calls, attaches bearer credentials
//!   and broadcasts session-expiry events on 401 responses.
//! - [`store`] holds the per-operation `loading`/`error` lifecycle and the
//!   last settled payload for each resource.
//! - [`model`] and [`format`] normalize the backend's shape-varying payloads
//!   into display-ready values.
//! - [`config`] provides file/env configuration and the injected credential
//!   store shared by the client and the session controller.

pub mod client;
pub mod config;
pub mod format;
pub mod model;
pub mod store;

pub use client::{
    unwrap_data, ApiClient, ApiError, AuthEvent, Operation, ACCESS_TOKEN_MISSING,
    BACKEND_UNREACHABLE, NO_REFRESH_TOKEN,
};
pub use config::{
    ApiConfig, Config, CredentialKey, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SecureString,
};
pub use store::{FinancialState, FinancialStore, Phase, ResourceState, SessionState, SessionStore};
