use thiserror::Error;

/// GitHub crate error types
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Octocrab error: {0}")]
    OctocrabError(#[from] octocrab::Error),
}

pub type GithubResult<T> = Result<T, GithubError>;
