use crate::extractors::WebhookSecret;
use axum::extract::FromRef;
use devpulse_cache::TtlCache;
use devpulse_github::GithubClient;
use std::sync::Arc;
use std::time::Duration;

/// TTLs and fetch window applied by the analytics/activity handlers
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub activity_ttl: Duration,
    pub analytics_ttl: Duration,
    /// Bounded historical window for the commit fan-out, in days; also the
    /// width of the contribution heatmap.
    pub history_days: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            activity_ttl: Duration::from_secs(30),
            analytics_ttl: Duration::from_secs(600),
            history_days: 365,
        }
    }
}

/// Application state for Axum dependency injection
///
/// The DI root holding every shared resource the handlers need: the GitHub
/// client, the process-wide response cache, the webhook secret for HMAC
/// verification and the cache policy. Constructed once in the binary; no
/// globals.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GithubClient>,
    /// Both endpoint payloads are cached as ready-to-serve JSON under their
    /// own keys; only fully successful computations are written.
    pub cache: Arc<TtlCache<serde_json::Value>>,
    pub webhook_secret: WebhookSecret,
    pub cache_policy: CachePolicy,
}

impl AppState {
    pub fn new(
        github: GithubClient,
        cache: TtlCache<serde_json::Value>,
        webhook_secret: WebhookSecret,
        cache_policy: CachePolicy,
    ) -> Self {
        Self {
            github: Arc::new(github),
            cache: Arc::new(cache),
            webhook_secret,
            cache_policy,
        }
    }
}

/// Allow the webhook extractor to access the secret directly
impl FromRef<AppState> for WebhookSecret {
    fn from_ref(state: &AppState) -> Self {
        state.webhook_secret.clone()
    }
}
