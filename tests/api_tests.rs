//! API integration tests
//!
//! These run against a live server seeded with demo data:
//!
//! ```sh
//! RUN_MODE=demo cargo run
//! cargo test -- --ignored
//! ```

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Log in as one of the demo accounts and return the bearer token
async fn get_auth_token(client: &Client, username: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a fresh equipment item as admin and return its id
async fn create_test_equipment(client: &Client, token: &str, name: &str) -> String {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "brand": "Sennheiser",
            "category": "microphones",
            "purchaseDate": "2024-03-01"
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No id in response").to_string()
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
async fn test_client_config_advertises_poll_interval() {
    let client = Client::new();

    let response = client
        .get(format!("{}/client-config", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["pollIntervalSecs"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_login_and_me() {
    let client = Client::new();
    let token = get_auth_token(&client, "admin").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_unknown_user_fails() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "nobody", "password": "nope" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_equipment_requires_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_create_equipment() {
    let client = Client::new();
    let token = get_auth_token(&client, "sam").await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "AKG C414",
            "brand": "AKG",
            "category": "microphones",
            "purchaseDate": "2024-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_lifecycle_and_notifications() {
    let client = Client::new();
    let admin_token = get_auth_token(&client, "admin").await;
    let member_token = get_auth_token(&client, "sam").await;

    let id = create_test_equipment(&client, &admin_token, "Sennheiser e935").await;

    // Member takes the mic into use
    let response = client
        .put(format!("{}/equipment/{}/status", BASE_URL, id))
        .bearer_auth(&member_token)
        .json(&json!({ "status": "in_use" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Member reports an issue; the item moves into maintenance
    let response = client
        .post(format!("{}/equipment/{}/logs", BASE_URL, id))
        .bearer_auth(&member_token)
        .json(&json!({ "description": "Switch is sticky" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "maintenance");

    // Toggles are rejected while under maintenance
    let response = client
        .put(format!("{}/equipment/{}/status", BASE_URL, id))
        .bearer_auth(&member_token)
        .json(&json!({ "status": "available" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // The admin cohort got an alert naming reporter and equipment
    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    let notifications: Value = response.json().await.expect("Failed to parse response");
    let alert = notifications
        .as_array()
        .expect("Expected an array")
        .iter()
        .find(|n| n["relatedEquipmentId"] == json!(id))
        .expect("No notification for the reported equipment");
    assert_eq!(alert["type"], "alert");
    assert_eq!(alert["read"], false);
    let message = alert["message"].as_str().expect("No message");
    assert!(message.contains("Sennheiser e935"));
    assert!(message.contains("Sam Reyes"));

    // Admin resolves; the reporter gets a targeted success notice
    let response = client
        .post(format!("{}/equipment/{}/resolve", BASE_URL, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "available");
    assert!(body["logs"][0]["resolvedAt"].is_string());

    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    let notifications: Value = response.json().await.expect("Failed to parse response");
    let success = notifications
        .as_array()
        .expect("Expected an array")
        .iter()
        .find(|n| n["relatedEquipmentId"] == json!(id))
        .expect("Reporter was not notified");
    assert_eq!(success["type"], "success");

    // Resolving again is rejected: the gate only opens once
    let response = client
        .post(format!("{}/equipment/{}/resolve", BASE_URL, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_mark_all_read_clears_the_visible_set() {
    let client = Client::new();
    let admin_token = get_auth_token(&client, "admin").await;
    let member_token = get_auth_token(&client, "sam").await;

    let id = create_test_equipment(&client, &admin_token, "Behringer HA400").await;
    client
        .post(format!("{}/equipment/{}/logs", BASE_URL, id))
        .bearer_auth(&member_token)
        .json(&json!({ "description": "Channel 2 dead" }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/notifications/read-all", BASE_URL))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");
    let notifications: Value = response.json().await.expect("Failed to parse response");
    assert!(notifications
        .as_array()
        .expect("Expected an array")
        .iter()
        .all(|n| n["read"] == json!(true)));
}
