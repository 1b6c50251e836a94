pub mod activity;
pub mod analytics;
pub mod caching;
pub mod error;
pub mod extractors;
pub mod health;
pub mod state;
pub mod webhook_handler;

// Re-export commonly used types
pub use activity::{ActivityResponse, get_activity};
pub use analytics::{AnalyticsResponse, get_analytics};
pub use caching::{clear_caches, ACTIVITY_CACHE_KEY, ANALYTICS_CACHE_KEY};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use extractors::{VerifiedWebhookPayload, WebhookSecret};
pub use health::health;
pub use state::{AppState, CachePolicy};
pub use webhook_handler::{clear_activity, handle_webhook};
