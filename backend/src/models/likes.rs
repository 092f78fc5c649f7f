use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

use super::users::UserSummary;

/// Result of recording a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffinityOutcome {
    pub is_new_edge: bool,
    pub is_mutual_match: bool,
}

/// A mutual match, derived from two like edges
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchedUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: UserSummary,
    /// When the second of the two likes was recorded
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Liker {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: UserSummary,
    pub liked_at: DateTime<Utc>,
}
