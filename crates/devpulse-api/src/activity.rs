use crate::{
    caching::{ACTIVITY_CACHE_KEY, mark_cached},
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use devpulse_github::{Event, EventType, GithubClient};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Number of events requested from the upstream feed per refresh.
const FEED_PAGE_SIZE: u8 = 30;

/// Activity feed payload served by `GET /api/activity`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub events: Vec<Event>,
    pub last_updated: DateTime<Utc>,
    pub cached: bool,
}

/// Serve the filtered, enriched public activity feed
///
/// Cache-first under a 30s default TTL. On a miss the newest events page is
/// fetched, create events and unknown kinds are dropped, and push events are
/// enriched with their commit lists via the compare API. Enrichment is
/// best-effort and concurrent; feed order is preserved.
pub async fn get_activity(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    if let Some(mut cached) = state.cache.get(ACTIVITY_CACHE_KEY) {
        mark_cached(&mut cached);
        return Ok(Json(cached));
    }

    let events = state.github.list_events(1, FEED_PAGE_SIZE).await?;

    let handles: Vec<_> = events
        .into_iter()
        .filter(|event| event.kind.is_noteworthy())
        .map(|event| {
            let github = Arc::clone(&state.github);
            tokio::spawn(enrich_push_event(github, event))
        })
        .collect();

    let mut events = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(event) => events.push(event),
            Err(e) => warn!(error = %e, "event enrichment task aborted"),
        }
    }

    let response = ActivityResponse {
        events,
        last_updated: Utc::now(),
        cached: false,
    };

    let value = serde_json::to_value(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize activity: {}", e)))?;

    state
        .cache
        .set(ACTIVITY_CACHE_KEY, value.clone(), state.cache_policy.activity_ttl);
    info!(events = response.events.len(), "activity feed refreshed");

    Ok(Json(value))
}

/// Attach the commit list to a push event, leaving it untouched on failure
async fn enrich_push_event(github: Arc<GithubClient>, mut event: Event) -> Event {
    if event.kind != EventType::Push {
        return event;
    }

    let (Some(before), Some(head)) = (event.payload.before.clone(), event.payload.head.clone())
    else {
        return event;
    };

    event.payload.commits = github.compare_commits(&event.repo.name, &before, &head).await;
    event
}
