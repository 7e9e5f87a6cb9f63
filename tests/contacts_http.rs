//! Contact CRUD over HTTP
//!
//! Run with `cargo test -- --ignored` (needs Docker).

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

fn contact(name: &str) -> Value {
    json!({
        "name": name,
        "surname": "Doe",
        "email": "john.doe@example.com",
        "phone": "+380123456789",
        "birthday": "1990-01-01",
        "extra_info": "Friend from school",
    })
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_contacts_crud() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("crud").await;
    let token = Some(token.as_str());

    let (status, created) = app
        .json(Method::POST, "/api/contacts", token, Some(contact("John")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "John");
    assert_eq!(created["birthday"], "1990-01-01");
    assert!(created.get("user_id").is_none());
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .json(Method::GET, &format!("/api/contacts/{}", id), token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, body) = app.json(Method::GET, "/api/contacts", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let mut updated = contact("Johnny");
    updated["extra_info"] = Value::Null;
    let (status, body) = app
        .json(Method::PUT, &format!("/api/contacts/{}", id), token, Some(updated))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Johnny");
    assert!(body["extra_info"].is_null());

    let (status, body) = app
        .json(Method::DELETE, &format!("/api/contacts/{}", id), token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Johnny");

    let (status, body) = app
        .json(Method::GET, &format!("/api/contacts/{}", id), token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Contact not found");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_contact_name_conflicts() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("dupcontact").await;
    let token = Some(token.as_str());

    app.json(Method::POST, "/api/contacts", token, Some(contact("Jane")))
        .await;
    let (status, body) = app
        .json(Method::POST, "/api/contacts", token, Some(contact("Jane")))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Contact with this name already exists");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_contacts_are_private() {
    let app = TestApp::spawn().await;
    let (_, owner) = app.signed_in_user("owner").await;
    let (_, other) = app.signed_in_user("other").await;

    let (_, created) = app
        .json(Method::POST, "/api/contacts", Some(owner.as_str()), Some(contact("Secret")))
        .await;
    let uri = format!("/api/contacts/{}", created["id"]);

    let (status, _) = app.json(Method::GET, &uri, Some(other.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.json(Method::DELETE, &uri, Some(other.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.json(Method::GET, "/api/contacts", Some(other.as_str()), None).await;
    assert!(body.as_array().unwrap().is_empty());

    // Same name is fine for a different owner
    let (status, _) = app
        .json(Method::POST, "/api/contacts", Some(other.as_str()), Some(contact("Secret")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_pagination_and_validation() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("paging").await;
    let token = Some(token.as_str());

    for name in ["A", "B", "C"] {
        app.json(Method::POST, "/api/contacts", token, Some(contact(name)))
            .await;
    }

    let (status, body) = app
        .json(Method::GET, "/api/contacts?skip=1&limit=1", token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["name"], "B");

    let (status, _) = app
        .json(Method::GET, "/api/contacts?skip=-1", token, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad = contact("Bad");
    bad["email"] = json!("not-an-email");
    let (status, body) = app
        .json(Method::POST, "/api/contacts", token, Some(bad))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_malformed_requests_use_error_envelope() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("malformed").await;
    let token = Some(token.as_str());

    let mut bad = contact("Bad");
    bad["birthday"] = json!("1990-13-45");
    let (status, body) = app
        .json(Method::POST, "/api/contacts", token, Some(bad))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app.json(Method::GET, "/api/contacts/abc", token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .json(Method::GET, "/api/contacts?skip=x", token, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
