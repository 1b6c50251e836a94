use crate::{
    error::{GithubError, GithubResult},
    types::{
        CalendarDay, CommitEnvelope, ContributionCalendar, Event, PushCommit, Repository,
    },
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use devpulse_core::Commit;
use octocrab::Octocrab;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Upstream page size cap for list endpoints.
const MAX_PER_PAGE: u8 = 100;

const CALENDAR_QUERY: &str = "
    query($username: String!) {
        user(login: $username) {
            contributionsCollection {
                contributionCalendar {
                    totalContributions
                    weeks {
                        contributionDays {
                            contributionCount
                            date
                        }
                    }
                }
            }
        }
    }
";

/// GitHub API client scoped to one account
///
/// Normalizes REST and GraphQL results into the domain commit/event model.
/// Cloning is cheap; the underlying octocrab client is shared.
#[derive(Clone)]
pub struct GithubClient {
    client: Octocrab,
    username: String,
}

impl GithubClient {
    /// Create a new client with bearer-token authentication
    pub fn new(token: String, username: String) -> GithubResult<Self> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| GithubError::ApiError(format!("Failed to create octocrab client: {e}")))?;

        Ok(Self { client, username })
    }

    /// Create client from an existing octocrab instance (tests point this at
    /// a mock server via `base_uri`)
    pub fn from_octocrab(client: Octocrab, username: String) -> Self {
        Self { client, username }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetch one page of the account's public events, newest first
    pub async fn list_events(&self, page: u32, per_page: u8) -> GithubResult<Vec<Event>> {
        let per_page = per_page.min(MAX_PER_PAGE);
        let route = format!(
            "/users/{}/events?page={}&per_page={}",
            self.username, page, per_page
        );
        let events: Vec<Event> = self.client.get(route, None::<&()>).await?;
        Ok(events)
    }

    /// Fetch all repositories for the account, sorted by last update
    pub async fn list_repositories(&self) -> GithubResult<Vec<Repository>> {
        let route = format!("/users/{}/repos?sort=updated&per_page=100", self.username);
        let repos: Vec<Repository> = self.client.get(route, None::<&()>).await?;
        Ok(repos)
    }

    /// Fetch commits for one repository authored at or after `since`
    ///
    /// Any per-call failure (network, rate limit, empty repository) yields
    /// an empty list so a single bad repository cannot abort the aggregate
    /// fetch. The failure is logged for observability.
    pub async fn list_commits(&self, repo: &str, since: DateTime<Utc>) -> Vec<Commit> {
        let route = format!(
            "/repos/{}/{}/commits?since={}",
            self.username,
            repo,
            since.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        match self.client.get::<Vec<CommitEnvelope>, _, _>(route, None::<&()>).await {
            Ok(envelopes) => envelopes.into_iter().map(CommitEnvelope::into_commit).collect(),
            Err(e) => {
                warn!(repo, error = %e, "commit listing failed; treating repository as empty");
                Vec::new()
            }
        }
    }

    /// Fan out `list_commits` across every repository for the last `days`
    /// days and flatten the results, ascending by author date
    ///
    /// Best-effort aggregation: a failing repository degrades completeness,
    /// not availability. Only the repository listing itself propagates.
    pub async fn list_recent_commits(&self, days: u32) -> GithubResult<Vec<Commit>> {
        let repos = self.list_repositories().await?;
        let since = Utc::now() - Duration::days(i64::from(days));

        let handles: Vec<_> = repos
            .into_iter()
            .map(|repo| {
                let client = self.clone();
                tokio::spawn(async move { client.list_commits(&repo.name, since).await })
            })
            .collect();

        let mut commits = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(batch) => commits.extend(batch),
                Err(e) => warn!(error = %e, "commit fetch task aborted"),
            }
        }

        commits.sort_by_key(|c| c.authored_at);
        debug!(count = commits.len(), "aggregated recent commits");
        Ok(commits)
    }

    /// Aggregate a weight per primary language across repositories
    ///
    /// The weight is a repository count per language, not source-byte
    /// volume; see DESIGN.md before extending this.
    pub async fn language_stats(&self) -> GithubResult<HashMap<String, u64>> {
        let repos = self.list_repositories().await?;

        let mut stats = HashMap::new();
        for repo in repos {
            if let Some(language) = repo.language {
                *stats.entry(language).or_insert(0) += 1;
            }
        }
        Ok(stats)
    }

    /// Fetch the account's day-keyed contribution calendar via GraphQL
    ///
    /// Unlike the per-repository commit listing, failures here propagate;
    /// the caller owns the fallback to locally computed equivalents.
    pub async fn contribution_calendar(&self) -> GithubResult<ContributionCalendar> {
        let payload = serde_json::json!({
            "query": CALENDAR_QUERY,
            "variables": { "username": self.username },
        });

        // octocrab strips the GraphQL `data` envelope; the reply starts at
        // the `user` field.
        let response: GraphQlData = self.client.graphql(&payload).await?;
        let calendar = response
            .user
            .map(|u| u.contributions_collection.contribution_calendar)
            .ok_or_else(|| {
                GithubError::ApiError("contribution calendar missing from GraphQL response".into())
            })?;

        Ok(ContributionCalendar {
            total_contributions: calendar.total_contributions,
            days: calendar
                .weeks
                .into_iter()
                .flat_map(|w| w.contribution_days)
                .collect(),
        })
    }

    /// Fetch the commits between two refs of a push event, best-effort
    ///
    /// `repo_full_name` is the `owner/name` form carried by events. Returns
    /// `None` on any failure; the event is served without commit details.
    pub async fn compare_commits(
        &self,
        repo_full_name: &str,
        before: &str,
        head: &str,
    ) -> Option<Vec<PushCommit>> {
        let route = format!("/repos/{repo_full_name}/compare/{before}...{head}");

        match self.client.get::<Comparison, _, _>(route, None::<&()>).await {
            Ok(comparison) => Some(
                comparison
                    .commits
                    .into_iter()
                    .map(|e| {
                        let commit = e.into_commit();
                        PushCommit {
                            sha: commit.sha,
                            message: commit.message,
                            author: crate::types::PushCommitAuthor {
                                name: commit.author_name,
                                email: commit.author_email,
                            },
                        }
                    })
                    .collect(),
            ),
            Err(e) => {
                warn!(repo = repo_full_name, error = %e, "compare query failed; serving event without commits");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct Comparison {
    commits: Vec<CommitEnvelope>,
}

#[derive(Deserialize)]
struct GraphQlData {
    user: Option<GraphQlUser>,
}

#[derive(Deserialize)]
struct GraphQlUser {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize)]
struct ContributionsCollection {
    #[serde(rename = "contributionCalendar")]
    contribution_calendar: RawCalendar,
}

#[derive(Deserialize)]
struct RawCalendar {
    #[serde(rename = "totalContributions")]
    total_contributions: u64,
    weeks: Vec<RawWeek>,
}

#[derive(Deserialize)]
struct RawWeek {
    #[serde(rename = "contributionDays")]
    contribution_days: Vec<CalendarDay>,
}
