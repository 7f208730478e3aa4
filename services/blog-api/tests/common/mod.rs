//! Common test utilities for blog-api integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use blog_api::{build_router, AppState, Config};
use http_body_util::BodyExt;
use quill_auth_core::{AuthConfig, HashCost};
use quill_db::Repositories;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cr3t!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestUser {
    pub id: u64,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let auth = AuthConfig::try_new("blog-api-test-signing-secret-0123456789")
            .unwrap()
            .with_hash_cost(HashCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            });
        let state = AppState::new(Repositories::new(), Config::new(auth)).unwrap();
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Send a request and return status plus parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let auth = token.map(bearer);
        self.send(Method::GET, uri, auth.as_deref(), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let auth = token.map(bearer);
        self.send(Method::POST, uri, auth.as_deref(), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let auth = token.map(bearer);
        self.send(Method::PUT, uri, auth.as_deref(), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let auth = token.map(bearer);
        self.send(Method::DELETE, uri, auth.as_deref(), None).await
    }

    /// Register and log in a user
    pub async fn user(&self, username: &str) -> TestUser {
        let (status, _) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "username": username, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        TestUser {
            id: body["data"]["id"].as_u64().unwrap(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a post and return its ID
    pub async fn create_post(&self, user: &TestUser, title: &str) -> u64 {
        let (status, body) = self
            .post(
                "/api/v1/posts",
                Some(&user.token),
                json!({ "title": title, "content": format!("{title} body") }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_u64().unwrap()
    }

    /// Create a comment and return its ID
    pub async fn create_comment(&self, user: &TestUser, post_id: u64, content: &str) -> u64 {
        let (status, body) = self
            .post(
                "/api/v1/comments",
                Some(&user.token),
                json!({ "post_id": post_id, "content": content }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_u64().unwrap()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
