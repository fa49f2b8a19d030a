use super::services::Services;
use crate::{api, auth::IdentityVerifier, docs::ApiDoc};
use axum::{
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    BoxError, Extension, Json, Router,
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tower::{buffer::BufferLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub struct AppRouter;

impl AppRouter {
    pub fn new(services: Services, verifier: Arc<IdentityVerifier>, timeout_secs: u64) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ]);

        Router::new()
            // API 路由
            .nest("/api/v1", api::app())
            // OpenAPI JSON
            .route("/api-docs/openapi.json", get(openapi_json))
            .layer(cors)
            .layer(
                ServiceBuilder::new()
                    .layer(Extension(services))
                    .layer(Extension(verifier))
                    .layer(TraceLayer::new_for_http())
                    .layer(HandleErrorLayer::new(move |err: BoxError| {
                        Self::handle_timeout_error(err, timeout_secs)
                    }))
                    .timeout(Duration::from_secs(timeout_secs))
                    .layer(BufferLayer::new(1024)),
            )
            .fallback(Self::handle_404)
    }

    async fn handle_404() -> impl IntoResponse {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {
                    "code": "NOT_FOUND",
                    "message": "The requested resource does not exist on this server!"
                },
                "success": false
            })),
        )
    }

    async fn handle_timeout_error(err: BoxError, timeout_secs: u64) -> (StatusCode, Json<serde_json::Value>) {
        if err.is::<tower::timeout::error::Elapsed>() {
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(json!({
                    "error": {
                        "code": "TIMEOUT",
                        "message": format!(
                            "Request took longer than the configured {} second timeout",
                            timeout_secs
                        ),
                        "timestamp": chrono::Utc::now().timestamp()
                    }
                })),
            )
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": {
                        "code": "INTERNAL_ERROR",
                        "message": format!("Unhandled internal error: {}", err),
                        "timestamp": chrono::Utc::now().timestamp()
                    }
                })),
            )
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
