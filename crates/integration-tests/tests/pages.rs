//! Public pages, login banners and response headers, end to end.

#![allow(clippy::unwrap_used)]

use reqwest::{StatusCode, header};
use sellah_integration_tests::{TestServer, location};

#[tokio::test]
async fn test_health_and_static_skip_the_gate() {
    let server = TestServer::start().await;
    let client = server.client();

    for path in ["/health", "/static/session-guard.js"] {
        let resp = client
            .get(server.url(path))
            .header(header::COOKIE, "auth_logged_out=true")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_public_pages_render_with_logout_cookie() {
    let server = TestServer::start().await;
    let client = server.client();

    for path in ["/", "/about", "/register", "/forgot-password", "/login"] {
        let resp = client
            .get(server.url(path))
            .header(header::COOKIE, "auth_logged_out=true")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_pages_are_not_cached() {
    let server = TestServer::start().await;

    let resp = server.client().get(server.url("/")).send().await.unwrap();
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store, max-age=0"
    );
    assert!(resp.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_logout_reason_banner_shows_once() {
    let server = TestServer::start().await;
    let client = server.client();

    server.sign_in(&client).await;
    server.log_out(&client, "password changed").await;

    let body = client
        .get(server.url("/login"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("You have been logged out: password changed"));

    let body = client
        .get(server.url("/login"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("You have been logged out"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let server = TestServer::start().await;
    let client = server.client();

    let resp = client
        .post(server.url("/login"))
        .form(&[("email", sellah_integration_tests::SELLER_EMAIL), ("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login?error=credentials"));

    let resp = client.get(server.url("/dashboard")).send().await.unwrap();
    assert_eq!(location(&resp), Some("/login"));
}
