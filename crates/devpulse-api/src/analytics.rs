use crate::{
    caching::{ANALYTICS_CACHE_KEY, mark_cached},
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use devpulse_core::{
    CodingSession, CommitFrequency, ContributionDay, LanguageFocus, analytics,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Analytics summary payload served by `GET /api/analytics`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub coding_hours: Vec<CodingSession>,
    pub commit_frequency: Vec<CommitFrequency>,
    pub consistency_score: u8,
    pub focus_areas: Vec<LanguageFocus>,
    pub contribution_heatmap: Vec<ContributionDay>,
    pub total_commits: u64,
    pub average_commits_per_day: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_updated: DateTime<Utc>,
    pub cached: bool,
}

/// Compute (or serve from cache) the engagement analytics summary
///
/// Cache-first under a 600s default TTL. On a miss, commits, language
/// weights and the contribution calendar are fetched concurrently. A
/// calendar failure falls back to commit-derived heatmap/streaks/
/// consistency and is never surfaced; a commits or language failure is a
/// total computation failure, surfaced as 500 with nothing cached.
pub async fn get_analytics(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    if let Some(mut cached) = state.cache.get(ANALYTICS_CACHE_KEY) {
        mark_cached(&mut cached);
        return Ok(Json(cached));
    }

    let history_days = state.cache_policy.history_days;
    let (commits, languages, calendar) = tokio::join!(
        state.github.list_recent_commits(history_days),
        state.github.language_stats(),
        state.github.contribution_calendar(),
    );
    let commits = commits?;
    let languages = languages?;

    let now = Utc::now();
    let today = now.date_naive();
    let window = history_days as usize;

    let coding_hours = analytics::sessionize(&commits);
    let commit_frequency = analytics::commit_frequency(&commits);

    let (heatmap, streaks, consistency, total_commits) = match calendar {
        Ok(calendar) => {
            // The calendar's per-day counts cover contributions the commit
            // fan-out may have missed (private repos, reviews), so prefer
            // them for the day-granular metrics.
            let series: Vec<CommitFrequency> = calendar
                .days
                .iter()
                .map(|d| CommitFrequency {
                    date: d.date,
                    count: d.contribution_count,
                })
                .collect();
            (
                analytics::heatmap_from_daily(&series, window, today),
                analytics::streaks_from_daily(&series, today),
                analytics::consistency_score_from_daily(&series, today),
                calendar.total_contributions,
            )
        }
        Err(e) => {
            warn!(error = %e, "contribution calendar unavailable; deriving metrics from commits");
            (
                analytics::contribution_heatmap(&commits, window, today),
                analytics::streaks(&commits, today),
                analytics::consistency_score(&commits, now),
                commits.len() as u64,
            )
        }
    };

    let active_days = commit_frequency.len();
    let average_commits_per_day = if active_days > 0 {
        (total_commits as f64 / active_days as f64 * 10.0).round() / 10.0
    } else {
        0.0
    };

    let response = AnalyticsResponse {
        coding_hours,
        commit_frequency,
        consistency_score: consistency,
        focus_areas: analytics::language_distribution(&languages),
        contribution_heatmap: heatmap,
        total_commits,
        average_commits_per_day,
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        last_updated: now,
        cached: false,
    };

    let value = serde_json::to_value(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize analytics: {}", e)))?;

    // Only a fully successful computation reaches this point
    state
        .cache
        .set(ANALYTICS_CACHE_KEY, value.clone(), state.cache_policy.analytics_ttl);
    info!(total_commits, "analytics summary recomputed");

    Ok(Json(value))
}
