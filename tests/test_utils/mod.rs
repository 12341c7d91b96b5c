//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{Router, body::Body, http::Response};
use serde_json::json;

use notechat::api::{AppState, SESSION_COOKIE, app};
use notechat::core::{AppConfig, ArchivalPolicy, Variant};

/// Config pointing both external APIs at local mock servers. Pass
/// `None` for `notion_url` to leave archival unconfigured.
pub fn test_config(variant: Variant, openai_url: &str, notion_url: Option<&str>) -> AppConfig {
    AppConfig {
        variant,
        archival_policy: ArchivalPolicy::default_for(variant),
        openai_api_hostname: openai_url.to_string(),
        openai_api_key: String::from("test-api-key"),
        openai_model: String::from("gpt-5-nano"),
        system_message: None,
        notion_api_hostname: notion_url.unwrap_or("http://127.0.0.1:9").to_string(),
        notion_api_key: notion_url.map(|_| String::from("secret_test")),
        notion_database_id: notion_url.map(|_| String::from("db-123")),
        session_ttl: Duration::from_secs(3600),
    }
}

/// Creates a test application router with its own in-memory state.
pub fn test_app(config: AppConfig) -> Router {
    let app_state = AppState::new(config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `name=value` pair of the session cookie set by a response,
/// ready to be sent back in a `cookie` header.
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", SESSION_COOKIE)))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": "gpt-5-nano",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
