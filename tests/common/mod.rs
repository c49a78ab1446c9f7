// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fitbuddy::config::Config;
use fitbuddy::db::LocalStore;
use fitbuddy::routes::create_router;
use fitbuddy::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over an in-memory store with the demo seeds.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), LocalStore::in_memory()));
    (create_router(state.clone()), state)
}

/// Send a request, optionally with a bearer token and JSON body.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Log in as `email` and return (token, user id).
#[allow(dead_code)]
pub async fn login(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// A valid onboarding form.
#[allow(dead_code)]
pub fn onboarding_form(name: &str) -> Value {
    json!({
        "name": name,
        "age": 29,
        "gender": "Female",
        "bio": "Early riser",
        "aboutMe": "Training for a half marathon.",
        "activities": ["Running", "Cycling"],
        "goals": ["Endurance"],
        "skillLevel": "Intermediate",
        "location": { "lat": 40.7829, "lng": -73.9654 },
        "availability": ["Sat", "Sun"]
    })
}

/// Log in and complete onboarding; returns (token, user id).
#[allow(dead_code)]
pub async fn onboarded_user(app: &Router, email: &str, name: &str) -> (String, String) {
    let (token, id) = login(app, email).await;
    let (status, body) = send(
        app,
        Method::POST,
        "/api/onboarding",
        Some(&token),
        Some(onboarding_form(name)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "onboarding failed: {}", body);
    (token, id)
}
