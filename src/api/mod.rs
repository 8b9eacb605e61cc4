//! HTTP layer exposing snippet analysis.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{routing::post, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::nlp::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

pub fn router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/analyze", post(routes::analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { analyzer })
}

pub async fn serve(analyzer: Arc<Analyzer>, host: String, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving call-insights API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(analyzer).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
