use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use services::generation::{ClaudeClient, TextGenerator};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub generator: Arc<dyn TextGenerator>,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dailywell_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Database
    let db = db::create_pool(&config.database_url).await?;

    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database migrations applied");

    if config.claude_api_key.is_empty() {
        tracing::warn!("CLAUDE_API_KEY is not set; summaries will fail and the coach will use its fallback reply");
    }
    let generator: Arc<dyn TextGenerator> = Arc::new(ClaudeClient::from_config(&config)?);

    let rate_limiter = RateLimitState::new(
        config.generation_rate_limit,
        config.generation_rate_window_secs,
    );

    let state = AppState {
        db,
        config: config.clone(),
        generator,
        rate_limiter,
    };

    let app = build_router(state).layer(cors_layer(&config)?);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    // Routes that call the generation service are capped per user
    let generation_routes = Router::new()
        .route(
            "/api/entries/:date/summary",
            post(handlers::summaries::generate_summary),
        )
        .route("/api/coach/messages", post(handlers::coach::send_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::limit_generation,
        ));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::health::me))
        // Daily entries
        .route("/api/entries", get(handlers::entries::list_entries))
        .route(
            "/api/entries/:date",
            get(handlers::entries::get_entry).put(handlers::entries::upsert_entry),
        )
        .route(
            "/api/entries/:date/compliance",
            get(handlers::entries::get_compliance),
        )
        // Reports
        .route("/api/reports/weekly", get(handlers::reports::weekly_trends))
        .route("/api/reports/export.csv", get(handlers::reports::export_csv))
        // Settings
        .route(
            "/api/settings/email",
            get(handlers::settings::get_email_settings)
                .put(handlers::settings::update_email_settings),
        )
        // Coach history
        .route("/api/chats", get(handlers::coach::list_chats))
        .route("/api/chats/:id", get(handlers::coach::get_chat))
        .merge(generation_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config.frontend_url.parse::<axum::http::HeaderValue>()?];
    // In dev, also allow LAN access (e.g. testing from a phone)
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true))
}
