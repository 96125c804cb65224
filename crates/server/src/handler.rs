//! HTTP routes.
//!
//! `GET /features` serves the collection through the tiered chain.
//! `GET|POST /refresh` forces a regeneration and answers with an empty body.
//! `/` and `/static` serve the map front end that loads `/features`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::time::Instant;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use classgeo_client::ContentPipeline;

use crate::error::WebError;
use crate::tiers::TieredChain;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<TieredChain>,
    pub pipeline: Arc<ContentPipeline>,
    pub request_timeout: Duration,
    pub static_dir: PathBuf,
}

impl AppState {
    fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}

pub fn router(state: AppState) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/features", get(features))
        .route("/refresh", get(refresh).post(refresh))
        .route_service("/", index)
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn features(State(state): State<AppState>) -> Result<Response, WebError> {
    let body = state.chain.respond(state.deadline()).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn refresh(State(state): State<AppState>) -> Result<StatusCode, WebError> {
    state.pipeline.regenerate(state.deadline()).await?;
    Ok(StatusCode::OK)
}
