//! HTTP server for hvacd.

use crate::config::Config;
use crate::routes;
use anyhow::Result;
use axum::Router;
use hvac_common::llm::TextGenerator;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers. Read-only after startup: the
/// catalog and rule tables are static, and the generator is an immutable
/// injected capability, so requests need no coordination.
pub struct AppState {
    pub config: Config,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            config,
            generator,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.server.bind_addr.clone();
    let permissive_cors = state.config.server.permissive_cors;
    let state = Arc::new(state);

    let mut app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::equipment_routes())
        .merge(routes::diagnostic_routes())
        .merge(routes::followup_routes())
        .merge(routes::image_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
