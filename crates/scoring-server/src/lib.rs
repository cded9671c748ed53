//! HTTP scoring services and Axum router setup.
//!
//! Two services share this crate:
//!
//! | Binary | Artifacts | Routes |
//! |--------|-----------|--------|
//! | `pipeline-service` | one pipeline file | `GET /health`, `POST /predict` |
//! | `client-service` | model + vectorizer files | `GET /health`, `POST /predict` |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::{ClientState, PipelineState};

/// Initializes compact `tracing` output, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();
}

fn with_layers(routes: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    routes.layer(trace_layer).layer(cors)
}

/// Router for the pipeline service.
pub fn pipeline_router(state: Arc<PipelineState>) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::pipeline::health))
        .route("/predict", post(handlers::pipeline::predict))
        .with_state(state);
    with_layers(routes)
}

/// Router for the client service.
pub fn client_router(state: Arc<ClientState>) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::client::predict))
        .with_state(state);
    with_layers(routes)
}

/// Binds `addr` and serves `app` until ctrl+c.
pub async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    }
}
