use crate::model::{CodingSession, Commit, CommitFrequency, ContributionDay, LanguageFocus, Streaks};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

/// Commits more than two hours apart belong to separate sessions.
const SESSION_GAP_SECS: i64 = 2 * 3600;

/// A lone commit still counts as half an hour of work.
const SESSION_FLOOR_HOURS: f64 = 0.5;

/// Consecutive active days may be up to 1.5 days apart and still count as
/// one streak, tolerating timezone and day-boundary jitter.
const STREAK_GAP_DAYS: f64 = 1.5;

/// Number of seconds in the recency window used by the consistency score.
const RECENCY_WINDOW_SECS: i64 = 7 * 86_400;

/// Group commits into work sessions and bucket them by day
///
/// Commits are sorted ascending by `authored_at`; a new session starts
/// whenever the gap to the previous commit exceeds two hours. A session's
/// duration is its end-to-start span in whole hours, floored at half an
/// hour, so a burst of commits inside a single hour registers as 0.5h.
/// Sessions are keyed by their start date; same-day sessions accumulate.
///
/// The sum of `commits` across the returned days always equals the number
/// of input commits.
pub fn sessionize(commits: &[Commit]) -> Vec<CodingSession> {
    if commits.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Commit> = commits.iter().collect();
    sorted.sort_by_key(|c| c.authored_at);

    let mut days: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    let mut start = sorted[0].authored_at;
    let mut end = start;
    let mut count: u32 = 1;

    for commit in &sorted[1..] {
        let gap = commit.authored_at.signed_duration_since(end);
        if gap.num_seconds() <= SESSION_GAP_SECS {
            end = commit.authored_at;
            count += 1;
        } else {
            record_session(&mut days, start, end, count);
            start = commit.authored_at;
            end = start;
            count = 1;
        }
    }
    record_session(&mut days, start, end, count);

    days.into_iter()
        .map(|(date, (hours, commits))| CodingSession {
            date,
            hours: (hours * 10.0).round() / 10.0,
            commits,
        })
        .collect()
}

fn record_session(
    days: &mut BTreeMap<NaiveDate, (f64, u32)>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    commits: u32,
) {
    let hours = (end.signed_duration_since(start).num_hours() as f64).max(SESSION_FLOOR_HOURS);
    let entry = days.entry(start.date_naive()).or_insert((0.0, 0));
    entry.0 += hours;
    entry.1 += commits;
}

/// Count commits per calendar day, ascending, omitting inactive days
pub fn commit_frequency(commits: &[Commit]) -> Vec<CommitFrequency> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for commit in commits {
        *counts.entry(commit.authored_at.date_naive()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(date, count)| CommitFrequency { date, count })
        .collect()
}

/// Score how consistently the account ships, 0-100
///
/// Weighted blend of three normalized sub-scores:
/// - *spread*: active days relative to a 90-day window;
/// - *regularity*: penalizes high variance in per-day commit counts;
/// - *recency*: commits within the last seven days of `now`.
///
/// Empty input scores 0.
pub fn consistency_score(commits: &[Commit], now: DateTime<Utc>) -> u8 {
    if commits.is_empty() {
        return 0;
    }

    let freq = commit_frequency(commits);
    let counts: Vec<u32> = freq.iter().map(|d| d.count).collect();
    let recent = commits
        .iter()
        .filter(|c| {
            let age = now.signed_duration_since(c.authored_at).num_seconds();
            (0..=RECENCY_WINDOW_SECS).contains(&age)
        })
        .count() as u64;

    blend_score(&counts, recent)
}

/// Consistency score over a per-day activity series
///
/// Used when the upstream calendar query succeeds and per-day contribution
/// counts are richer than the locally fetched commits. Zero-count entries
/// are ignored.
pub fn consistency_score_from_daily(days: &[CommitFrequency], today: NaiveDate) -> u8 {
    let active: Vec<&CommitFrequency> = days.iter().filter(|d| d.count > 0).collect();
    if active.is_empty() {
        return 0;
    }

    let counts: Vec<u32> = active.iter().map(|d| d.count).collect();
    let recent = active
        .iter()
        .filter(|d| (0..=7).contains(&today.signed_duration_since(d.date).num_days()))
        .map(|d| d.count as u64)
        .sum();

    blend_score(&counts, recent)
}

/// Shared scoring formula over per-active-day commit counts
fn blend_score(daily_counts: &[u32], commits_last_7_days: u64) -> u8 {
    let active_days = daily_counts.len() as f64;
    let total: u64 = daily_counts.iter().map(|&c| c as u64).sum();

    let spread = (active_days / 90.0 * 100.0).min(100.0);

    let mean = total as f64 / active_days;
    let variance = daily_counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / active_days;
    let regularity = (100.0 - variance * 5.0).max(0.0);

    let recency = (commits_last_7_days as f64 / 7.0 * 50.0).min(100.0);

    (spread * 0.4 + regularity * 0.3 + recency * 0.3).round() as u8
}

/// Normalize language weights into sorted percentage shares
///
/// Percentages are rounded independently and may not sum to exactly 100.
/// Ties sort by language name so the output is deterministic.
pub fn language_distribution(weights: &HashMap<String, u64>) -> Vec<LanguageFocus> {
    let total: u64 = weights.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut focus: Vec<LanguageFocus> = weights
        .iter()
        .map(|(language, &weight)| LanguageFocus {
            language: language.clone(),
            weight,
            percentage: (weight as f64 / total as f64 * 100.0).round() as u32,
        })
        .collect();

    focus.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| a.language.cmp(&b.language))
    });
    focus
}

/// Map a day's commit count to a 0-4 heatmap intensity level
///
/// # Examples
///
/// ```
/// use devpulse_core::analytics::level_for;
///
/// assert_eq!(level_for(0), 0);
/// assert_eq!(level_for(1), 1);
/// assert_eq!(level_for(3), 2);
/// assert_eq!(level_for(6), 3);
/// assert_eq!(level_for(10), 4);
/// ```
pub fn level_for(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=9 => 3,
        _ => 4,
    }
}

/// Build a fixed-width contribution heatmap from commits
///
/// Always returns exactly `days` entries, contiguous by date, oldest first,
/// ending on `today`. Inactive days are zero-filled at level 0.
pub fn contribution_heatmap(commits: &[Commit], days: usize, today: NaiveDate) -> Vec<ContributionDay> {
    heatmap_from_daily(&commit_frequency(commits), days, today)
}

/// Build the heatmap from an already-aggregated per-day series
pub fn heatmap_from_daily(
    series: &[CommitFrequency],
    days: usize,
    today: NaiveDate,
) -> Vec<ContributionDay> {
    let by_date: HashMap<NaiveDate, u32> = series.iter().map(|d| (d.date, d.count)).collect();

    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
        .map(|date| {
            let count = by_date.get(&date).copied().unwrap_or(0);
            ContributionDay {
                date,
                count,
                level: level_for(count),
            }
        })
        .collect()
}

/// Compute current and longest streaks of consecutive active days
///
/// The current streak is non-zero only when the most recent active day is
/// `today` or yesterday; an active day may not have registered yet for the
/// current clock day, hence the one-day tolerance.
pub fn streaks(commits: &[Commit], today: NaiveDate) -> Streaks {
    streaks_from_daily(&commit_frequency(commits), today)
}

/// Streaks over an already-aggregated per-day series (zero days ignored)
pub fn streaks_from_daily(days: &[CommitFrequency], today: NaiveDate) -> Streaks {
    let mut dates: Vec<NaiveDate> = days.iter().filter(|d| d.count > 0).map(|d| d.date).collect();
    dates.sort_unstable();
    dates.dedup();

    let Some(&last) = dates.last() else {
        return Streaks::default();
    };

    let gap_days =
        |earlier: NaiveDate, later: NaiveDate| later.signed_duration_since(earlier).num_days() as f64;

    let mut current = 0;
    let yesterday = today.checked_sub_days(Days::new(1));
    if last == today || Some(last) == yesterday {
        current = 1;
        for pair in dates.windows(2).rev() {
            if gap_days(pair[0], pair[1]) <= STREAK_GAP_DAYS {
                current += 1;
            } else {
                break;
            }
        }
    }

    let mut longest: u32 = 1;
    let mut run: u32 = 1;
    for pair in dates.windows(2) {
        if gap_days(pair[0], pair[1]) <= STREAK_GAP_DAYS {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    Streaks { current, longest }
}
