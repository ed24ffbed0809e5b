//! Common test infrastructure for HTTP integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tally_config::{SecurityConfig, ServerConfig};
use tally_repository::{
    DatabasePool, DatabasePoolInterface, SqliteCategoryRepository, SqliteExpenseRepository, SqliteUserRepository,
};
use tally_rest::{create_router, AppState};
use tally_security::{PasswordHasher, TokenProvider};
use tally_service::{AuthServiceComponent, CategoryServiceComponent, ExpenseServiceComponent, StatsServiceComponent};
use tower::ServiceExt;

/// A full router over a private in-memory database.
pub struct TestApp {
    router: Router,
}

/// Status and decoded JSON body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// Returns the `data` member of the envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// Returns the error code of the envelope.
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }

    /// Returns the error message of the envelope.
    pub fn error_message(&self) -> &str {
        self.body["error"]["message"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Wires every component by hand, mirroring the server module.
    pub async fn new() -> Self {
        let pool: Arc<dyn DatabasePoolInterface> =
            Arc::new(DatabasePool::in_memory().await.expect("Failed to create in-memory database"));

        let users = Arc::new(SqliteUserRepository::new(pool.clone()));
        let categories = Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let expenses = Arc::new(SqliteExpenseRepository::new(pool.clone()));

        let security = Arc::new(SecurityConfig {
            jwt_secret: "integration-test-secret-key-with-enough-bytes".to_string(),
            ..SecurityConfig::default()
        });

        let state = AppState {
            auth_service: Arc::new(AuthServiceComponent::new(
                users,
                Arc::new(PasswordHasher::with_cost(1)),
                Arc::new(TokenProvider::new(security)),
            )),
            category_service: Arc::new(CategoryServiceComponent::new(categories.clone(), expenses.clone())),
            expense_service: Arc::new(ExpenseServiceComponent::new(expenses.clone(), categories.clone())),
            stats_service: Arc::new(StatsServiceComponent::new(expenses, categories)),
            db_pool: pool,
        };

        Self {
            router: create_router(state, &ServerConfig::default()),
        }
    }

    /// Sends a request and decodes the body as JSON (`Null` when empty).
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self.router.clone().oneshot(request).await.expect("Request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user and returns its access token.
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "Password123",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "register failed: {}", response.body);
        response.data()["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }

    /// Creates an expense and returns the response.
    pub async fn create_expense(&self, token: &str, category: &str, amount: &str, date: &str) -> TestResponse {
        self.post(
            "/api/v1/expenses",
            token,
            json!({
                "category": category,
                "amount": amount,
                "description": format!("{category} purchase"),
                "date": date,
            }),
        )
        .await
    }
}
