//! Test harness driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use smartgen_api::{AppState, create_router};
use smartgen_core::auth::hash_password;
use smartgen_core::clock::{Clock, ManualClock};
use smartgen_core::store::Store;
use smartgen_db::{MemoryStore, seed_admin};
use smartgen_shared::AppConfig;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@smartgenedux.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap()
}

/// Demo configuration: strict mode off and no gateway secret.
pub fn bypass_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.gateway.strict = false;
    config
}

pub async fn spawn_app(config: AppConfig) -> TestApp {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));

    seed_admin(
        store.as_ref(),
        ADMIN_EMAIL,
        "Super Admin",
        hash_password(ADMIN_PASSWORD).unwrap(),
    )
    .await
    .unwrap();

    let dyn_store: Arc<dyn Store> = store.clone();
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let state = AppState::from_config(&config, dyn_store, dyn_clock).unwrap();

    TestApp {
        router: create_router(state),
        store,
        clock,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Option<Value>) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), body).await
    }

    pub async fn login(&self) -> String {
        let response = self
            .post(
                "/api/admin/login",
                json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Registers a school and returns its id.
    pub async fn register_school(&self, email: &str) -> String {
        let response = self.post("/api/schools/register", school_body(email)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Creates a school-safal subscription for 50 students and returns its id.
    pub async fn create_subscription(&self, school_id: &str) -> String {
        let response = self
            .post(
                "/api/subscriptions/create",
                json!({
                    "schoolId": school_id,
                    "productType": "school-safal",
                    "studentCount": 50,
                    "contractYears": 1,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Opens an order and returns `(paymentId, orderId)`.
    pub async fn create_order(&self, subscription_id: &str) -> (String, String) {
        let response = self
            .post(
                "/api/payments/create-order",
                json!({ "subscriptionId": subscription_id }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        (
            response.body["paymentId"].as_str().unwrap().to_string(),
            response.body["orderId"].as_str().unwrap().to_string(),
        )
    }
}

pub fn school_body(email: &str) -> Value {
    json!({
        "name": "Test School",
        "email": email,
        "phone": "9876543210",
        "address": "12 MG Road",
        "city": "Pune",
        "state": "Maharashtra",
        "pincode": "411001",
        "principalName": "A. Sharma",
        "studentCount": 50,
    })
}

pub fn parse_time(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}
