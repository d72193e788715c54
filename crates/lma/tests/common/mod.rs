//! Test utilities and common setup.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Response;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use lma::api::{self, AppState};
use lma::auth::{AuthConfig, AuthState, SessionClaims};
use lma::db::Database;
use lma::onboarding::OnboardingRepository;
use lma::shopify::{
    AdminClient, GraphQlRequest, GraphQlTransport, ShopSession, ShopifyConfig, ShopifyResult,
};

pub const SHOP: &str = "academy.myshopify.com";
pub const API_KEY: &str = "test-api-key";
pub const API_SECRET: &str = "test-api-secret";

type Responder = dyn Fn(&GraphQlRequest) -> ShopifyResult<Value> + Send + Sync;

/// Fake Admin API answering from a closure and recording every request.
pub struct FakeShopify {
    responder: Box<Responder>,
    requests: Mutex<Vec<GraphQlRequest>>,
}

impl FakeShopify {
    pub fn new(
        responder: impl Fn(&GraphQlRequest) -> ShopifyResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| r.operation_name)
            .collect()
    }
}

#[async_trait]
impl GraphQlTransport for FakeShopify {
    async fn execute(&self, session: &ShopSession, request: &GraphQlRequest) -> ShopifyResult<Value> {
        assert_eq!(session.shop(), SHOP);
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

/// A running test application.
pub struct TestApp {
    pub router: Router,
    pub shopify: Arc<FakeShopify>,
    pub submissions: OnboardingRepository,
}

fn shopify_config() -> ShopifyConfig {
    ShopifyConfig {
        api_key: Some(API_KEY.to_string()),
        api_secret: Some(API_SECRET.to_string()),
        shop: Some(SHOP.to_string()),
        access_token: Some("shpat_test".to_string()),
        ..Default::default()
    }
}

/// Create a test application over a fake Admin API.
pub async fn test_app_with(dev_mode: bool, shopify: FakeShopify) -> TestApp {
    build_app(dev_mode, shopify_config(), shopify).await
}

/// Application whose config carries no API secret.
pub async fn test_app_without_secret(dev_mode: bool, shopify: FakeShopify) -> TestApp {
    let config = ShopifyConfig {
        api_secret: None,
        ..shopify_config()
    };
    build_app(dev_mode, config, shopify).await
}

async fn build_app(dev_mode: bool, config: ShopifyConfig, shopify: FakeShopify) -> TestApp {
    let db = Database::in_memory().await.unwrap();

    let shopify = Arc::new(shopify);
    let client = AdminClient::new(shopify.clone(), config.namespace.clone(), config.pages.clone());

    let auth_config = AuthConfig {
        dev_mode,
        ..Default::default()
    };
    let auth_state = AuthState::new(auth_config, &config);

    let state = AppState::new(client, &db, auth_state);
    TestApp {
        router: api::create_router(state),
        shopify,
        submissions: OnboardingRepository::new(db.pool().clone()),
    }
}

/// Dev-mode application: requests need no session token.
pub async fn test_app(shopify: FakeShopify) -> TestApp {
    test_app_with(true, shopify).await
}

/// Admin session token for the test shop.
pub fn session_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        iss: Some(format!("https://{SHOP}/admin")),
        dest: format!("https://{SHOP}"),
        aud: Some(API_KEY.to_string()),
        sub: Some("1".to_string()),
        exp: now + 60,
        nbf: Some(now - 5),
        iat: Some(now - 5),
        jti: Some("test-jti".to_string()),
        sid: Some("test-sid".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(API_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Append a valid app proxy signature to a query string.
pub fn signed_query(query: &str) -> String {
    let params = lma::auth::proxy::parse_query(query);
    let signature = lma::auth::proxy::sign(API_SECRET, &params).unwrap();
    format!("{query}&signature={signature}")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Reference list payload for a customer metafield.
pub fn references(items: &[(&str, &str)]) -> Value {
    let edges: Vec<Value> = items
        .iter()
        .map(|(id, handle)| json!({ "node": { "id": id, "handle": handle } }))
        .collect();
    json!({ "data": { "customer": { "metafield": { "references": { "edges": edges } } } } })
}

/// Course tree payload with one module holding `lessons` in order.
pub fn course_tree(handle: &str, lessons: &[&str]) -> Value {
    let lessons: Vec<Value> = lessons
        .iter()
        .map(|id| {
            json!({ "node": { "id": id, "handle": id, "type": "lesson", "fields": [
                { "key": "title", "value": format!("Lesson {id}") },
                { "key": "video_url", "value": format!("https://cdn.example/{id}.mp4") }
            ] } })
        })
        .collect();
    json!({ "data": { "metaobjectByHandle": {
        "id": format!("gid://shopify/Metaobject/{handle}"),
        "handle": handle,
        "type": "course",
        "fields": [
            { "key": "title", "value": handle },
            { "key": "description", "value": "Course description" },
            { "key": "modules", "value": "[]", "references": { "edges": [
                { "node": { "id": format!("module-{handle}"), "handle": "module-1", "type": "module", "fields": [
                    { "key": "title", "value": "Module 1" },
                    { "key": "lessons", "value": "[]", "references": { "edges": lessons } }
                ] } }
            ] } }
        ]
    } } })
}

pub fn customer_update_ok() -> Value {
    json!({ "data": { "customerUpdate": { "customer": { "id": "x" }, "userErrors": [] } } })
}
