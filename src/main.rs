//! Telecom Customer Churn Prediction
//!
//! Web form in front of a previously trained churn classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   CHURN PREDICTOR                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌───────────────┐   │
//! │  │ Form / API │──▶│  Prediction  │──▶│ Loaded Model  │   │
//! │  │  (Axum)    │   │  Outcome     │   │ (read-only)   │   │
//! │  └────────────┘   └──────────────┘   └───────▲───────┘   │
//! │                                              │ once      │
//! │                                     ┌────────┴────────┐  │
//! │                                     │  Model Loader   │  │
//! │                                     └────────▲────────┘  │
//! │                                              │           │
//! │                                   churn_model_pipeline.json
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod pipeline;
mod views;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use pipeline::{loader::ModelStatus, ModelLoader};
use views::Views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "churn_predictor=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Churn predictor starting ({})...", config.environment);

    // Single load attempt; failure is served as a blocking page until restart
    let loader = ModelLoader::new(config.model_path.clone());
    tracing::info!("Model artifact: {}", loader.path().display());
    let model = loader.status().clone();

    let state = AppState::new(model, config.clone())
        .context("Failed to compile page templates")?;

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: ModelStatus,
    pub views: Arc<Views>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(model: ModelStatus, config: config::Config) -> Result<Self, minijinja::Error> {
        Ok(Self {
            model,
            views: Arc::new(Views::new()?),
            config,
        })
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::InternalError(format!("handler panicked: {}", details)).into_response()
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Browser form
    let page_routes = Router::new()
        .route("/", get(handlers::form::index))
        .route("/predict", post(handlers::form::predict));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::api::predict));

    let cors = if state.config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)
    };

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
