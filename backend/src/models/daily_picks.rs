use serde::Serialize;
use sqlx::FromRow;
use chrono::NaiveDate;

use super::users::UserSummary;

/// A candidate chosen for a pick batch, before persistence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub user_id: i32,
    pub score: f64,
}

/// A stored pick joined with the picked user's profile
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScoredPick {
    pub score: f64,
    #[sqlx(flatten)]
    pub user: UserSummary,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RefreshOutcome {
    pub count: usize,
    pub picked_for_date: NaiveDate,
}
