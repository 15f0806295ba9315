//! Photoscope gateway: a local stand-in for the photo search and upload API.
//!
//! Implements the same wire contract as the deployed gateway and storage
//! bucket, backed by an in-memory store, so the client library and the CLI
//! can be exercised end to end.
//!
//! # Modules
//!
//! - [`api`]: axum handlers for `/search`, `/upload`, `/photos/{key}` and `/health`
//! - [`store`]: in-memory bucket with label indexing
//! - [`query`]: keyword extraction and label matching
//! - [`detect`]: pluggable label detectors
//! - [`types`]: gateway config, envelope styles, shared state

pub mod api;
pub mod detect;
pub mod query;
pub mod store;
pub mod types;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use api::*;
use types::GatewayContext;

/// All gateway routes over the given state.
pub fn build_router(ctx: GatewayContext) -> Router {
    let body_limit = ctx.config.max_upload_bytes;
    Router::new()
        .route("/health", get(api_health))
        .route("/search", get(api_search))
        .route("/upload", put(api_upload))
        .route("/photos/{key}", put(api_put_object).get(api_get_object))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
