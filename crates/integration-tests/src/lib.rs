//! Integration tests for Flatstore.
//!
//! Each test starts its own storefront on an ephemeral port over a fresh,
//! seeded data directory and drives it over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p flatstore-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::Path;

use reqwest::Client;
use tempfile::TempDir;

use flatstore_storefront::config::StorefrontConfig;
use flatstore_storefront::db::{Database, seed::seed_defaults, store::JsonFileStore};
use flatstore_storefront::state::AppState;

/// A running storefront bound to `127.0.0.1:0`.
pub struct TestServer {
    addr: SocketAddr,
    client: Client,
    data_dir: TempDir,
}

impl TestServer {
    /// Start a seeded server with admin routes open.
    pub async fn start() -> Self {
        Self::with_config(StorefrontConfig::default()).await
    }

    /// Start a seeded server that enforces admin identity.
    pub async fn start_enforcing_admin() -> Self {
        Self::with_config(StorefrontConfig {
            require_admin: true,
            ..StorefrontConfig::default()
        })
        .await
    }

    async fn with_config(mut config: StorefrontConfig) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create data directory");
        config.data_dir = data_dir.path().to_path_buf();

        let store = JsonFileStore::open(data_dir.path()).expect("Failed to open store");
        let db = Database::new(store);
        seed_defaults(&db).await.expect("Failed to seed");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local address");

        let app = flatstore_storefront::app(AppState::new(config, db));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            addr,
            client: Self::new_client(),
            data_dir,
        }
    }

    /// A fresh client with its own cookie jar.
    #[must_use]
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// The server's default client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Directory holding the collection files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }
}
