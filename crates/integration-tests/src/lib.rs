//! End-to-end tests for the Sellah dashboard.
//!
//! [`TestServer`] starts the real router on an ephemeral port with an
//! in-memory session store, so the tests need no external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sellah-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `session_guard` - logout flags, the logout gate and the session event API
//! - `order_status` - order status API
//! - `pages` - public pages, login banners and response headers

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use sellah_core::Email;
use sellah_dashboard::config::{DashboardConfig, LogFormat, SellerAccountConfig};
use sellah_dashboard::services::hash_password;
use sellah_dashboard::state::AppState;

/// Seller email accepted by the test server.
pub const SELLER_EMAIL: &str = "seller@sellah.test";

/// Seller password accepted by the test server.
pub const SELLER_PASSWORD: &str = "correct horse battery staple";

/// A dashboard running on a local port for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start a dashboard with a known seller account.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the test config is invalid.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let config = test_config(addr);
        let app = sellah_dashboard::app(AppState::new(config));

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self { addr }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A browser-like client: keeps cookies, does not follow redirects.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Sign in as the test seller.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn sign_in(&self, client: &Client) -> Response {
        client
            .post(self.url("/login"))
            .form(&[("email", SELLER_EMAIL), ("password", SELLER_PASSWORD)])
            .send()
            .await
            .expect("Failed to sign in")
    }

    /// Log out with `reason`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn log_out(&self, client: &Client, reason: &str) -> Response {
        client
            .post(self.url("/logout"))
            .form(&[("reason", reason)])
            .send()
            .await
            .expect("Failed to log out")
    }
}

fn test_config(addr: SocketAddr) -> DashboardConfig {
    DashboardConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        seller: SellerAccountConfig {
            email: Email::parse(SELLER_EMAIL).expect("Invalid test email"),
            password_hash: SecretString::from(
                hash_password(SELLER_PASSWORD).expect("Failed to hash test password"),
            ),
        },
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../dashboard/static"),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Value of the `Location` header, if any.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Every `Set-Cookie` header of a response.
#[must_use]
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}
