//! Greeting endpoint tests for both greeting modes.
//! Run with: cargo test -p demo-service --test greetings_test

mod common;

use common::TestApp;
use demo_service::config::GreetingMode;
use demo_service::handlers::greetings::{greeting_prompt, MISSING_NAME_MESSAGE};
use demo_service::services::providers::mock::MockBehavior;
use demo_service::services::providers::MockTextGenerator;
use demo_service::services::InMemoryUserStore;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const BLANK_QUERIES: &[&str] = &[
    "/api/greetings",
    "/api/greetings?name=",
    "/api/greetings?name=%20%20",
    "/api/greetings?name=%09%0A",
    "/api/greetings/",
    "/api/greetings/%20",
];

async fn spawn_llm(generator: Arc<MockTextGenerator>) -> TestApp {
    TestApp::spawn_with(
        GreetingMode::Llm,
        Arc::new(InMemoryUserStore::new()),
        generator,
    )
    .await
}

async fn spawn_simple() -> TestApp {
    TestApp::spawn_with(
        GreetingMode::Simple,
        Arc::new(InMemoryUserStore::new()),
        Arc::new(MockTextGenerator::new(MockBehavior::Fail(
            "simple mode must not call the generator".to_string(),
        ))),
    )
    .await
}

#[tokio::test]
async fn llm_greeting_returns_generated_text_verbatim() {
    let generator = Arc::new(MockTextGenerator::replying("  Peace and light to you, Luca.\n"));
    let app = spawn_llm(generator.clone()).await;

    let response = app.get("/api/greetings?name=Luca").await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "  Peace and light to you, Luca.\n" }));
    assert_eq!(generator.prompts(), vec![greeting_prompt("Luca")]);
}

#[tokio::test]
async fn llm_greeting_accepts_the_name_in_the_path() {
    let generator = Arc::new(MockTextGenerator::replying("Hello, Anna Maria"));
    let app = spawn_llm(generator.clone()).await;

    let response = app.get("/api/greetings/Anna%20Maria").await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Hello, Anna Maria");
    assert_eq!(generator.prompts(), vec![greeting_prompt("Anna Maria")]);
}

#[tokio::test]
async fn llm_greeting_rejects_missing_or_blank_names_without_calling_the_generator() {
    let generator = Arc::new(MockTextGenerator::replying("unused"));
    let app = spawn_llm(generator.clone()).await;

    for path in BLANK_QUERIES {
        let response = app.get(path).await;
        assert_eq!(response.status(), 400, "{}", path);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "message": MISSING_NAME_MESSAGE }), "{}", path);
    }

    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn llm_failure_maps_to_bad_gateway() {
    let generator = Arc::new(MockTextGenerator::new(MockBehavior::Fail(
        "connection refused".to_string(),
    )));
    let app = spawn_llm(generator).await;

    let response = app.get("/api/greetings?name=Luca").await;

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Bad Gateway"));
    // The upstream cause stays in the logs.
    assert!(!body.to_string().contains("connection refused"));
}

#[tokio::test]
async fn llm_timeout_maps_to_gateway_timeout() {
    let generator = Arc::new(MockTextGenerator::new(MockBehavior::SlowReply(
        Duration::from_secs(5),
        "too late".to_string(),
    )));
    let app = spawn_llm(generator).await;

    let response = app.get("/api/greetings?name=Luca").await;

    assert_eq!(response.status(), 504);
}

#[tokio::test]
async fn simple_greeting_says_hello_in_plain_text() {
    let app = spawn_simple().await;

    for name in ["Luca", "Anna Maria", " padded "] {
        let response = app
            .client
            .get(format!("{}/api/greetings", app.address))
            .query(&[("name", name)])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(response.text().await.unwrap(), format!("Hello, {}!", name));
    }
}

#[tokio::test]
async fn simple_greeting_rejects_missing_or_blank_names() {
    let app = spawn_simple().await;

    for path in BLANK_QUERIES {
        let response = app.get(path).await;
        assert_eq!(response.status(), 400, "{}", path);
        assert_eq!(response.text().await.unwrap(), MISSING_NAME_MESSAGE);
    }
}
