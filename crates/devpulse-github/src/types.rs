use chrono::{DateTime, NaiveDate, Utc};
use devpulse_core::Commit;
use serde::{Deserialize, Serialize};

/// Public event kinds from the user events feed
///
/// GitHub names these `PushEvent`, `PullRequestEvent` and so on; unknown
/// kinds deserialize into `Other` so a new upstream event type never breaks
/// the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "PushEvent")]
    Push,
    #[serde(rename = "PullRequestEvent")]
    PullRequest,
    #[serde(rename = "IssuesEvent")]
    Issues,
    #[serde(rename = "CreateEvent")]
    Create,
    #[serde(rename = "DeleteEvent")]
    Delete,
    #[serde(rename = "ReleaseEvent")]
    Release,
    #[serde(rename = "WatchEvent")]
    Watch,
    #[serde(rename = "ForkEvent")]
    Fork,
    #[serde(other)]
    Other,
}

impl EventType {
    /// Whether the event represents meaningful development activity
    ///
    /// Create events (branch/tag/repo creation) are excluded outright;
    /// everything outside the allowlist is dropped from the activity feed.
    pub fn is_noteworthy(&self) -> bool {
        matches!(
            self,
            Self::Push
                | Self::PullRequest
                | Self::Issues
                | Self::Release
                | Self::Watch
                | Self::Fork
                | Self::Delete
        )
    }
}

/// The account that triggered an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
    pub avatar_url: String,
}

/// Repository reference carried inside an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepo {
    pub name: String,
    pub url: String,
}

/// Type-dependent event payload, flattened to the fields the feed uses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Filled in after the fact for push events via the compare API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commits: Option<Vec<PushCommit>>,
}

/// One public event from the user events feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub actor: Actor,
    pub repo: EventRepo,
    pub payload: EventPayload,
    pub created_at: DateTime<Utc>,
}

/// Commit summary attached to an enriched push event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushCommit {
    pub sha: String,
    pub message: String,
    pub author: PushCommitAuthor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushCommitAuthor {
    pub name: String,
    pub email: String,
}

/// Repository entry from the account's repository listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Wire shape of one entry from the commit listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CommitEnvelope {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: CommitSignature,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl CommitEnvelope {
    /// Flatten the nested wire shape into the domain commit
    pub fn into_commit(self) -> Commit {
        Commit {
            sha: self.sha,
            author_name: self.commit.author.name,
            author_email: self.commit.author.email,
            authored_at: self.commit.author.date,
            message: self.commit.message,
        }
    }
}

/// Day-keyed contribution calendar from the aggregate GraphQL query
#[derive(Debug, Clone)]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}
