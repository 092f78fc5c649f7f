//! Daily recommendation engine.
//!
//! Candidates are ranked by Jaccard similarity of interest-tag sets. Slots the
//! positive scores can't fill are topped up with random zero-score users.

use std::collections::HashSet;

use chrono::NaiveDate;
use chrono_tz::Tz;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use tracing::info;

use crate::constants::DAILY_PICK_LIMIT;
use crate::db::{daily_picks, interests, users};
use crate::error::AppError;
use crate::models::{InterestSet, RefreshOutcome, ScoredCandidate, ScoredPick};
use crate::utils::dates;

/// |a ∩ b| / |a ∪ b|, or 0 when both sets are empty
pub fn jaccard_similarity(a: &HashSet<i32>, b: &HashSet<i32>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Choose up to `limit` picks for `target_id` out of `candidates`.
///
/// Positive scores come first, best first (ties by user id). Remaining slots
/// get a random sample of zero-score users. The target and duplicate ids are
/// skipped.
pub fn select_picks<R: Rng + ?Sized>(
    target_id: i32,
    target_interests: &HashSet<i32>,
    candidates: &[InterestSet],
    limit: usize,
    rng: &mut R,
) -> Vec<ScoredCandidate> {
    let mut seen = HashSet::new();
    let mut scored = Vec::new();
    let mut unscored = Vec::new();

    for candidate in candidates {
        if candidate.user_id == target_id || !seen.insert(candidate.user_id) {
            continue;
        }
        let candidate_interests: HashSet<i32> = candidate.interest_ids.iter().copied().collect();
        let score = jaccard_similarity(target_interests, &candidate_interests);
        let pick = ScoredCandidate { user_id: candidate.user_id, score };
        if score > 0.0 {
            scored.push(pick);
        } else {
            unscored.push(pick);
        }
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.user_id.cmp(&b.user_id)));
    scored.truncate(limit);

    if scored.len() < limit {
        unscored.shuffle(rng);
        let remaining = limit - scored.len();
        scored.extend(unscored.into_iter().take(remaining));
    }

    scored
}

/// Regenerate today's picks for a user
pub async fn refresh_daily_picks(pool: &PgPool, user_id: i32, tz: Tz) -> Result<RefreshOutcome, AppError> {
    // Pinned once so persistence and any read-back agree on the day
    let picked_for_date = dates::today(tz);
    refresh_daily_picks_for_date(pool, user_id, picked_for_date).await
}

pub async fn refresh_daily_picks_for_date(
    pool: &PgPool,
    user_id: i32,
    picked_for_date: NaiveDate,
) -> Result<RefreshOutcome, AppError> {
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::not_found("USER_NOT_FOUND", "User not found"));
    }

    let interest_sets = interests::get_all_interest_sets(pool).await?;
    let target_interests: HashSet<i32> = interest_sets
        .iter()
        .find(|set| set.user_id == user_id)
        .map(|set| set.interest_ids.iter().copied().collect())
        .unwrap_or_default();

    let picks = {
        let mut rng = rand::rng();
        select_picks(user_id, &target_interests, &interest_sets, DAILY_PICK_LIMIT, &mut rng)
    };

    let mut tx = pool.begin().await?;
    daily_picks::replace_daily_picks(&mut tx, user_id, picked_for_date, &picks).await?;
    tx.commit().await?;

    let positive = picks.iter().filter(|pick| pick.score > 0.0).count();
    info!(
        "Refreshed daily picks for user {} on {}: {} picks ({} with shared interests)",
        user_id,
        picked_for_date,
        picks.len(),
        positive
    );

    Ok(RefreshOutcome {
        count: picks.len(),
        picked_for_date,
    })
}

/// Today's stored picks, best first. Empty until a refresh has run.
pub async fn get_daily_picks(pool: &PgPool, user_id: i32, tz: Tz) -> Result<Vec<ScoredPick>, AppError> {
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::not_found("USER_NOT_FOUND", "User not found"));
    }

    let picks = daily_picks::get_daily_picks(pool, user_id, dates::today(tz)).await?;
    Ok(picks)
}
