use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::server::ServeState;

pub fn build_router(state: ServeState) -> Router {
    Router::new()
        .route("/check", get(check_handler))
        .route("/healthz", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CheckQuery {
    imei: Option<String>,
}

async fn check_handler(
    State(state): State<ServeState>,
    Query(query): Query<CheckQuery>,
) -> Response {
    let Some(imei) = query.imei else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "IMEI parameter is missing" })),
        )
            .into_response();
    };

    match state.checker.check(&imei).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome.to_wire(&imei))).into_response(),
        Err(err) => {
            error!(error = %err, "compatibility check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
