//! SciPlan gateway — relay for generation and video-search requests.
//!
//! Forwards structured client requests to the external providers with
//! server-held credentials, serves the static frontend, and reports every
//! failure as a uniform `{"error": message}` JSON body.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod providers;
mod routes;

use config::GatewayConfig;
use providers::{GeminiClient, YouTubeClient};
use routes::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }
    if config.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY is not set; video search requests will fail");
    }

    let state = AppState {
        gemini: GeminiClient::new(config.gemini_api_key.clone()),
        youtube: YouTubeClient::new(config.youtube_api_key.clone()),
    };
    let app = routes::router(state, &config.static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(%addr, "gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
