pub mod analytics;
pub mod model;

// Re-export commonly used types
pub use analytics::{
    commit_frequency, consistency_score, consistency_score_from_daily, contribution_heatmap,
    heatmap_from_daily, language_distribution, level_for, sessionize, streaks, streaks_from_daily,
};
pub use model::{
    CodingSession, Commit, CommitFrequency, ContributionDay, LanguageFocus, Streaks,
};
