//! Registration, email confirmation and login over HTTP
//!
//! Run with `cargo test -- --ignored` (needs Docker).

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::{unique, unique_peer, TestApp, PASSWORD};
use contacts_api::services::AuthService;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_register_returns_profile_and_sends_email() {
    let app = TestApp::spawn().await;
    let username = unique("reg");

    let (status, body) = app.register(&username).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["confirmed"], false);
    assert_eq!(body["role"], "user");
    assert!(body["avatar"]
        .as_str()
        .unwrap()
        .starts_with("https://www.gravatar.com/avatar/"));
    assert!(body.get("hashed_password").is_none());

    // The verification email is sent from a background task
    let mut sent = false;
    for _ in 0..20 {
        if !app.mail_server.received_requests().await.unwrap().is_empty() {
            sent = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(sent, "verification email was not sent");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_register_duplicate_email_then_username() {
    let app = TestApp::spawn().await;
    let username = unique("dup");
    app.register(&username).await;

    let (status, body) = app.register(&username).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "User with this email already exists");

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "username": username,
                "email": format!("other_{}@example.com", username),
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "User with this username already exists");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_login_requires_confirmed_email() {
    let app = TestApp::spawn().await;
    let username = unique("unconfirmed");
    app.register(&username).await;

    let (status, body) = app.login(&username, PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "EMAIL_NOT_CONFIRMED");

    let (status, body) = app.login(&username, "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_confirm_email_flow() {
    let app = TestApp::spawn().await;
    let username = unique("confirm");
    let email = format!("{}@example.com", username);
    app.register(&username).await;

    let token = AuthService::create_email_token(&email, &app.state.config().jwt).unwrap();
    let uri = format!("/api/auth/confirmed_email/{}", token);

    let (status, body) = app.json(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email confirmed");

    let (status, body) = app.json(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Your email is already confirmed");

    let (status, body) = app.login(&username, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_confirm_email_rejects_garbage_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .json(Method::GET, "/api/auth/confirmed_email/not-a-token", None, None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_EMAIL_TOKEN");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_request_email_statuses() {
    let app = TestApp::spawn().await;
    let (username, _) = app.signed_in_user("confirmed").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/request_email",
            None,
            Some(serde_json::json!({ "email": format!("{}@example.com", username) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Your email is already confirmed");

    let pending = unique("pending");
    app.register(&pending).await;
    let (_, body) = app
        .json(
            Method::POST,
            "/api/auth/request_email",
            None,
            Some(serde_json::json!({ "email": format!("{}@example.com", pending) })),
        )
        .await;
    assert_eq!(body["message"], "Check your email for confirmation");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_me_requires_token_and_is_rate_limited() {
    let app = TestApp::spawn().await;
    let (username, token) = app.signed_in_user("me").await;

    let (status, _) = app.json(Method::GET, "/api/contacts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .json(Method::GET, "/api/contacts", Some("bogus.token.value"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let peer = unique_peer();

    // Rejected requests don't use up the window
    for _ in 0..12 {
        let (status, _) = app.anonymous_me_from(peer).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    for _ in 0..10 {
        let (status, body) = app.me_from(&token, peer).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], username.as_str());
    }

    let (status, body) = app.me_from(&token, peer).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "TOO_MANY_REQUESTS");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_healthchecker() {
    let app = TestApp::spawn().await;

    let (status, body) = app.json(Method::GET, "/api/healthchecker", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the contacts API!");
}
