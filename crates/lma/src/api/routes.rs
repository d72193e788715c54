//! API route definitions.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

use crate::auth::{proxy_middleware, session_middleware};

use super::handlers::{self, courses, students};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let auth_state = state.auth.clone();

    // Embedded admin routes (session token)
    let admin_routes = Router::new()
        .route("/courses", get(courses::list_courses))
        .route("/courses/{handle}", get(courses::get_course))
        .nest("/students", student_routes())
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            session_middleware,
        ));

    // Storefront routes forwarded by the app proxy (signed query string)
    let proxy_routes = Router::new()
        .nest("/students", student_routes())
        .layer(middleware::from_fn_with_state(auth_state, proxy_middleware));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", admin_routes)
        .nest("/proxy", proxy_routes)
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(students::list_students))
        .route("/progress", get(students::student_progress))
        .route("/submit-onboarding", post(students::submit_onboarding))
        .route("/{id}", get(students::get_student))
        .route("/{id}/onboarded", post(students::mark_onboarded))
}

/// Origins the embedded admin may call from.
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Configured origins, plus local frontends in dev mode. Outside dev mode an
/// empty list denies every cross-origin request.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in state.auth.allowed_origins() {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => warn!(origin = %origin, "Ignoring invalid CORS origin"),
        }
    }
    if state.auth.is_dev_mode() {
        for origin in DEV_ORIGINS.map(HeaderValue::from_static) {
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
    }

    if origins.is_empty() {
        warn!("No CORS origins configured, cross-origin requests are denied");
        return CorsLayer::new().allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")));
    }

    info!(count = origins.len(), "CORS origins configured");
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{AuthConfig, AuthState};
    use crate::db::Database;
    use crate::shopify::testing::ScriptedTransport;
    use crate::shopify::{AdminClient, PageSizes, ShopifyConfig};

    async fn router(dev_mode: bool) -> Router {
        let db = Database::in_memory().await.unwrap();
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(json!({ "data": {} }))));
        let client = AdminClient::new(transport, "custom", PageSizes::default());
        let shopify = ShopifyConfig {
            shop: Some("academy.myshopify.com".into()),
            access_token: Some("shpat_test".into()),
            ..Default::default()
        };
        let auth = AuthState::new(
            AuthConfig {
                dev_mode,
                ..Default::default()
            },
            &shopify,
        );
        create_router(AppState::new(client, &db, auth))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/courses")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_dev_mode_allows_local_frontend() {
        let response = router(true)
            .await
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_default_production_config_denies_localhost() {
        let response = router(false)
            .await
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();

        assert_ne!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.as_bytes()),
            Some(&b"http://localhost:3000"[..])
        );
    }
}
