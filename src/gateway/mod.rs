//! HTTP gateway (Axum) for the audit service.
//!
//! This module is primarily used by the `axiom` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::GatewayError;
pub use state::HandlerState;

use crate::oracle::Oracle;
use crate::trial::AXIOM_STATUS_HEADER;

pub const AXIOM_STATUS_HEALTHY: &str = "healthy";
pub const AXIOM_STATUS_READY: &str = "ready";
pub const AXIOM_STATUS_ERROR: &str = "error";

pub fn create_router_with_state<O: Oracle + 'static>(state: HandlerState<O>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<O>))
        .route(
            "/api/trials",
            post(handler::submit_trial_handler::<O>).get(handler::list_trials_handler::<O>),
        )
        .route(
            "/api/trials/{id}",
            get(handler::get_trial_handler::<O>).delete(handler::delete_trial_handler::<O>),
        )
        .route("/api/trials/{id}/report", get(handler::report_handler::<O>))
        .route("/api/contact", post(handler::contact_handler::<O>))
        .route("/api/auth/register", post(handler::register_handler::<O>))
        .route("/api/auth/login", post(handler::login_handler::<O>))
        .route("/api/auth/logout", post(handler::logout_handler::<O>))
        .route("/api/auth/me", get(handler::current_user_handler::<O>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub storage: &'static str,
    pub relay: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        AXIOM_STATUS_HEADER,
        HeaderValue::from_static(AXIOM_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<O: Oracle + 'static>(State(state): State<HandlerState<O>>) -> Response {
    let storage_status = if state.storage_path.exists() && state.storage_path.is_dir() {
        AXIOM_STATUS_READY
    } else {
        AXIOM_STATUS_ERROR
    };

    let relay_status = if state.relay.is_some() {
        "configured"
    } else {
        "disabled"
    };

    let components = ComponentStatus {
        http: AXIOM_STATUS_READY,
        storage: storage_status,
        relay: relay_status,
    };

    let is_ready = components.storage == AXIOM_STATUS_READY;
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(
        AXIOM_STATUS_HEADER,
        HeaderValue::from_str(status_msg).unwrap_or(HeaderValue::from_static("error")),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
