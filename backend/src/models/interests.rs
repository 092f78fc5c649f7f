use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Interest {
    pub id: i32,
    pub name: String,
}

/// A user's interest-tag ids, as loaded for similarity scoring
#[derive(Debug, Clone, FromRow)]
pub struct InterestSet {
    pub user_id: i32,
    pub interest_ids: Vec<i32>,
}
