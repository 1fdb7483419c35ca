//! In-process HTTP client for handler tests, backed by a temporary data directory.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::domain::SplitCalculator;
use crate::storage::csv::test_utils::TestEnvironment;
use crate::{create_router, AppState};

pub struct TestClient {
    _env: TestEnvironment,
    router: Router,
}

impl TestClient {
    pub async fn new() -> Self {
        let env = TestEnvironment::new().await.unwrap();
        let state = AppState::new(&env.connection, SplitCalculator::strict());
        let router = create_router(state, "http://localhost:8080").unwrap();
        Self { _env: env, router }
    }

    /// Sends one request; the body is parsed as JSON, or `Null` when empty
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
