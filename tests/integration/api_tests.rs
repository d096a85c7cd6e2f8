//! API integration tests against a running server
//!
//! Start the server with `JWT_SECRET` set to the value below, then run
//! `cargo test -- --ignored`.

use library_server::models::user::{AccountTypeSlug, UserClaims};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";
const JWT_SECRET: &str = "change-this-secret-in-production";

fn token(user_id: Uuid, account_type: AccountTypeSlug) -> String {
    UserClaims::new("integration", user_id, account_type, 1)
        .create_token(JWT_SECRET)
        .expect("Failed to sign token")
}

async fn create_book(client: &Client, admin_token: &str, inventory: i32) -> String {
    let response = client
        .post(format!("{}/library", BASE_URL))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": "Integration Book",
            "author": "Test Author",
            "inventory": inventory,
            "score": 5,
            "introduction": "Created by the integration tests"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["book"]["id"].as_str().expect("No book ID").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/library", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_rejects_missing_name() {
    let client = Client::new();
    let admin = token(Uuid::new_v4(), AccountTypeSlug::Admin);

    let response = client
        .post(format!("{}/library", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "name": "",
            "introduction": "No name"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Please fill in the name!");
}

#[tokio::test]
#[ignore]
async fn test_borrow_until_empty() {
    let client = Client::new();
    let admin_id = Uuid::new_v4();
    let admin = token(admin_id, AccountTypeSlug::Admin);
    let reader = token(Uuid::new_v4(), AccountTypeSlug::Reader);

    let book_id = create_book(&client, &admin, 1).await;

    let response = client
        .get(format!("{}/library/{}/borrow", BASE_URL, book_id))
        .bearer_auth(&reader)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["inventory"], 0);

    let response = client
        .get(format!("{}/library/{}/borrow", BASE_URL, book_id))
        .bearer_auth(&reader)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .get(format!("{}/borrows/me", BASE_URL))
        .bearer_auth(&reader)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Cleanup
    let response = client
        .get(format!("{}/library/{}/remove", BASE_URL, book_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_view_counts_pages() {
    let client = Client::new();
    let admin = token(Uuid::new_v4(), AccountTypeSlug::Admin);
    let book_id = create_book(&client, &admin, 2).await;

    for _ in 0..2 {
        let response = client
            .get(format!("{}/library/{}", BASE_URL, book_id))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }

    let response = client
        .get(format!("{}/library/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["pv"].as_i64().expect("No pv") >= 2);

    let _ = client
        .get(format!("{}/library/{}/remove", BASE_URL, book_id))
        .bearer_auth(&admin)
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_remove_by_other_admin_is_not_found() {
    let client = Client::new();
    let owner = token(Uuid::new_v4(), AccountTypeSlug::Admin);
    let other = token(Uuid::new_v4(), AccountTypeSlug::Admin);
    let book_id = create_book(&client, &owner, 1).await;

    let response = client
        .get(format!("{}/library/{}/remove", BASE_URL, book_id))
        .bearer_auth(&other)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/library/{}/remove", BASE_URL, book_id))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}
