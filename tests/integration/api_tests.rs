//! API integration tests against a running server
//!
//! Run with: cargo test --test api_tests -- --ignored
//! Admin tests need SUPER_ADMIN_EMAIL / SUPER_ADMIN_PASSWORD for an existing account.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8]).to_uppercase()
}

/// Register a fresh student and return (email, token)
async fn student_token(client: &Client) -> (String, String) {
    let email = format!("{}@campus.edu", unique("student").to_lowercase());
    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret",
            "name": "Integration Student",
            "role": "STUDENT",
            "yearSection": "BSCS-3A"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = login(client, "/auth/login", json!({ "email": email, "password": "secret" })).await;
    (email, token)
}

async fn super_admin_token(client: &Client) -> String {
    let email = std::env::var("SUPER_ADMIN_EMAIL").expect("SUPER_ADMIN_EMAIL not set");
    let password = std::env::var("SUPER_ADMIN_PASSWORD").expect("SUPER_ADMIN_PASSWORD not set");
    login(
        client,
        "/auth/loginSuperAdmin",
        json!({ "email": email, "password": password }),
    )
    .await
}

async fn login(client: &Client, path: &str, body: Value) -> String {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success(), "login failed: {}", response.status());

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_wrong_password_is_rejected() {
    let client = Client::new();
    let (email, _) = student_token(&client).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Wrong password.");
}

#[tokio::test]
#[ignore]
async fn test_student_cannot_create_items() {
    let client = Client::new();
    let (_, token) = student_token(&client).await;

    let response = client
        .post(format!("{}/items", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": unique("MOUSE"),
            "categoryName": "MOUSE",
            "locationName": "2CL3B"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Assemble a computer, open a session, refuse a second one, close it,
/// then schedule and complete maintenance.
#[tokio::test]
#[ignore]
async fn test_computer_lifecycle() {
    let client = Client::new();
    let admin = super_admin_token(&client).await;
    let (_, student) = student_token(&client).await;

    let mut parts = Vec::new();
    for category in ["MOUSE", "KEYBOARD", "MONITOR", "SYSTEM_UNIT"] {
        let name = unique(category);
        let response = client
            .post(format!("{}/items", BASE_URL))
            .bearer_auth(&admin)
            .json(&json!({
                "name": name,
                "categoryName": category,
                "locationName": "2CL3B"
            }))
            .send()
            .await
            .expect("Failed to create item");
        assert_eq!(response.status(), StatusCode::CREATED);
        parts.push(name);
    }

    let response = client
        .post(format!("{}/computers", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "name": unique("PC"),
            "locationName": "2cl3b",
            "mouseName": parts[0],
            "keyboardName": parts[1],
            "monitorName": parts[2],
            "systemUnitName": parts[3]
        }))
        .send()
        .await
        .expect("Failed to assemble computer");
    assert_eq!(response.status(), StatusCode::CREATED);
    let computer: Value = response.json().await.expect("Failed to parse computer");
    let computer_id = computer["data"]["id"].as_i64().expect("No computer id");

    let response = client
        .post(format!("{}/computer-logs", BASE_URL))
        .bearer_auth(&student)
        .json(&json!({ "computerId": computer_id }))
        .send()
        .await
        .expect("Failed to open session");
    assert_eq!(response.status(), StatusCode::CREATED);
    let log: Value = response.json().await.expect("Failed to parse log");
    let log_uuid = log["data"]["uuid"].as_str().expect("No log uuid").to_string();

    let response = client
        .post(format!("{}/computer-logs", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "computerId": computer_id }))
        .send()
        .await
        .expect("Failed to send second session");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .get(format!("{}/computers/status/{}", BASE_URL, computer_id))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to fetch status");
    let status: Value = response.json().await.expect("Failed to parse status");
    assert_eq!(status["data"]["status"], "IN_USE");

    let response = client
        .patch(format!("{}/computer-logs/end-log/{}", BASE_URL, log_uuid))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to end session");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .patch(format!("{}/computer-logs/end-log/{}", BASE_URL, log_uuid))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to send second end");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/maintenance", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "computerId": computer_id,
            "scheduleDate": "2030-01-15T08:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to schedule maintenance");
    assert_eq!(response.status(), StatusCode::CREATED);
    let maintenance: Value = response.json().await.expect("Failed to parse maintenance");
    let maintenance_id = maintenance["data"]["id"].as_i64().expect("No maintenance id");

    let response = client
        .post(format!("{}/computer-logs", BASE_URL))
        .bearer_auth(&student)
        .json(&json!({ "computerId": computer_id }))
        .send()
        .await
        .expect("Failed to send session during maintenance");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .patch(format!(
            "{}/maintenance/mark-as-done/{}",
            BASE_URL, maintenance_id
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to complete maintenance");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/computers/status/{}", BASE_URL, computer_id))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to fetch status");
    let status: Value = response.json().await.expect("Failed to parse status");
    assert_eq!(status["data"]["status"], "AVAILABLE");
}
