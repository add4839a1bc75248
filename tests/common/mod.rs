//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Once;

use finboard::{ApiClient, ApiConfig, FinancialStore, MemoryCredentialStore, SessionStore};

use mock_backend::MockBackend;

static INIT_TRACING: Once = Once::new();

/// Install a tracing subscriber honoring `RUST_LOG`; safe to call from every
/// test.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Find an available port, then release it. Connecting to it afterwards
/// fails, which makes it a convenient unreachable backend.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Client wired to the given mock backend with a fresh in-memory credential
/// store.
pub fn test_client(backend: &MockBackend) -> (ApiClient, Arc<MemoryCredentialStore>) {
    init_tracing();
    let credentials = Arc::new(MemoryCredentialStore::default());
    let config = ApiConfig {
        base_url: backend.base_url(),
        connect_timeout_seconds: 2,
    };
    let client = ApiClient::new(&config, credentials.clone()).expect("Failed to build client");
    (client, credentials)
}

/// Client pointed at a closed port.
pub fn unreachable_client() -> (ApiClient, Arc<MemoryCredentialStore>) {
    init_tracing();
    let credentials = Arc::new(MemoryCredentialStore::default());
    let config = ApiConfig {
        base_url: format!("http://127.0.0.1:{}", free_port()),
        connect_timeout_seconds: 2,
    };
    let client = ApiClient::new(&config, credentials.clone()).expect("Failed to build client");
    (client, credentials)
}

/// Session store backed by the given mock backend.
pub fn test_session(backend: &MockBackend) -> (SessionStore, Arc<MemoryCredentialStore>) {
    let (client, credentials) = test_client(backend);
    (SessionStore::new(client, credentials.clone()), credentials)
}

/// Financial store backed by the given mock backend.
pub fn test_financial(backend: &MockBackend) -> FinancialStore {
    let (client, _credentials) = test_client(backend);
    FinancialStore::new(client)
}
