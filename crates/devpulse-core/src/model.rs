use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single commit, normalized from the upstream API
///
/// `authored_at` is the ordering key for all temporal logic; commits are
/// immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub author_name: String,
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
    pub message: String,
}

/// One day's worth of coding sessions
///
/// Sessions are bucketed into a day by the session's *start* time; multiple
/// sessions on the same day accumulate hours and commit counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingSession {
    pub date: NaiveDate,
    pub hours: f64,
    pub commits: u32,
}

/// Number of commits on one calendar day (active days only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFrequency {
    pub date: NaiveDate,
    pub count: u32,
}

/// One cell of the contribution heatmap
///
/// `level` is a 0-4 intensity bucket derived from `count` via fixed
/// thresholds (0, 1, 3, 6, 10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

/// Share of one language across the account's repositories
///
/// `weight` is currently a repository count per primary language, not a
/// source-byte volume, even though downstream consumers present it as one.
/// Preserved as-is; see DESIGN.md before extending this toward true
/// byte-volume focus metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFocus {
    pub language: String,
    pub weight: u64,
    pub percentage: u32,
}

/// Current and longest run of consecutive active days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_serialize_as_plain_iso_days() {
        let session = CodingSession {
            date: "2026-03-10".parse().unwrap(),
            hours: 1.5,
            commits: 4,
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["date"], "2026-03-10");
        assert_eq!(json["hours"], 1.5);
    }

    #[test]
    fn contribution_day_round_trips() {
        let day = ContributionDay {
            date: "2026-03-10".parse().unwrap(),
            count: 7,
            level: 3,
        };

        let json = serde_json::to_string(&day).unwrap();
        let back: ContributionDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }
}
