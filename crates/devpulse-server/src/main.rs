mod config;

use axum::{
    Router,
    routing::{get, post},
};
use config::AppConfig;
use devpulse_api::{
    AppState, CachePolicy, WebhookSecret, clear_activity, get_activity, get_analytics,
    handle_webhook, health,
};
use devpulse_cache::TtlCache;
use devpulse_github::GithubClient;
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully");

    // Create GitHub API client
    let github = match GithubClient::new(
        config.github.token.expose_secret().to_string(),
        config.github.username,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create GitHub API client: {}", e);
            std::process::exit(1);
        }
    };
    info!("GitHub client created for {}", github.username());

    let cache_policy = CachePolicy {
        activity_ttl: Duration::from_secs(config.cache.activity_ttl_secs),
        analytics_ttl: Duration::from_secs(config.cache.analytics_ttl_secs),
        history_days: config.cache.history_days,
    };

    // One cache per process, injected through AppState
    let app_state = AppState::new(
        github,
        TtlCache::new(),
        WebhookSecret::new(config.webhook.secret.expose_secret().to_string()),
        cache_policy,
    );

    // Build Axum router
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/analytics", get(get_analytics))
        .route("/api/activity", get(get_activity))
        .route("/api/activity/clear", post(clear_activity))
        .route("/api/webhook", post(handle_webhook))
        .with_state(app_state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
