mod common;

use common::TestApp;
use reqwest::StatusCode;

fn providers(body: &serde_json::Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("data is an array")
        .iter()
        .map(|config| config["provider"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_catalog_is_public_and_complete() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/subscriptions_configs")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(providers(&body), vec!["Netflix", "Spotify", "Stadia"]);

    let netflix = &body["data"][0];
    assert_eq!(netflix["status"], "active");
    assert_eq!(netflix["plans"].as_array().unwrap().len(), 2);
    assert_eq!(netflix["plans"][1]["status"], "deprecated");
    assert_eq!(netflix["plans"][0]["currency"], "EUR");
    assert_eq!(netflix["plans"][0]["billing_cycle_days"], 30);
}

#[tokio::test]
async fn test_list_catalog_active_only() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/subscriptions_configs?active_only=true")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(providers(&body), vec!["Netflix", "Spotify"]);

    let netflix_plans: Vec<&str> = body["data"][0]["plans"]
        .as_array()
        .unwrap()
        .iter()
        .map(|plan| plan["name"].as_str().unwrap())
        .collect();
    assert_eq!(netflix_plans, vec!["Standard"]);
}

#[tokio::test]
async fn test_get_provider_config() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/subscriptions_configs/Spotify")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["provider"], "Spotify");
    assert_eq!(body["data"]["plans"][0]["name"], "Premium Individual");
    assert_eq!(body["data"]["plans"][0]["price"], 10.99);
}

#[tokio::test]
async fn test_get_unknown_provider() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/subscriptions_configs/Nowhere")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
