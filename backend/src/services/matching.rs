//! Affinity ledger writes and mutual-match detection.

use sqlx::PgPool;
use tracing::info;

use crate::constants::{DEFAULT_LIKES_PAGE_SIZE, MAX_LIKES_PAGE_SIZE};
use crate::db::{likes, users};
use crate::error::AppError;
use crate::models::{AffinityOutcome, Liker, MatchedUser};
use crate::utils::{normalize_world_address, page_bounds};

/// Whose matches to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSubject {
    Id(i32),
    Address(String),
}

pub fn validate_user_id(user_id: i32) -> Result<(), AppError> {
    if user_id <= 0 {
        return Err(AppError::validation("INVALID_USER_ID", "User id must be a positive integer"));
    }
    Ok(())
}

pub fn validate_affinity(liker_id: i32, liked_id: i32) -> Result<(), AppError> {
    validate_user_id(liker_id)?;
    validate_user_id(liked_id)?;
    if liker_id == liked_id {
        return Err(AppError::validation("SELF_LIKE_NOT_ALLOWED", "Self-liking is not allowed"));
    }
    Ok(())
}

/// Record liker→liked. Repeating a like is a no-op that still reports match state.
pub async fn record_affinity(pool: &PgPool, liker_id: i32, liked_id: i32) -> Result<AffinityOutcome, AppError> {
    validate_affinity(liker_id, liked_id)?;

    if !users::user_exists(pool, liker_id).await? {
        return Err(AppError::not_found("LIKER_NOT_FOUND", "Liker user not found"));
    }
    if !users::user_exists(pool, liked_id).await? {
        return Err(AppError::not_found("LIKED_USER_NOT_FOUND", "Liked user not found"));
    }

    let is_new_edge = likes::insert_like(pool, liker_id, liked_id).await?;
    let is_mutual_match = likes::like_exists(pool, liked_id, liker_id).await?;

    if is_new_edge && is_mutual_match {
        info!("💞 New match between users {} and {}", liker_id, liked_id);
    }

    Ok(AffinityOutcome { is_new_edge, is_mutual_match })
}

pub async fn resolve_subject(pool: &PgPool, subject: &MatchSubject) -> Result<i32, AppError> {
    match subject {
        MatchSubject::Id(user_id) => {
            validate_user_id(*user_id)?;
            if users::user_exists(pool, *user_id).await? {
                Ok(*user_id)
            } else {
                Err(AppError::not_found("USER_NOT_FOUND", "User not found"))
            }
        }
        MatchSubject::Address(raw) => {
            let address = normalize_world_address(raw)?;
            users::get_user_by_world_address(pool, &address)
                .await?
                .map(|user| user.id)
                .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "No user owns this address"))
        }
    }
}

/// Users with likes in both directions, earliest match first
pub async fn get_matches(pool: &PgPool, subject: &MatchSubject) -> Result<Vec<MatchedUser>, AppError> {
    let user_id = resolve_subject(pool, subject).await?;
    let matches = likes::get_mutual_matches(pool, user_id).await?;
    Ok(matches)
}

pub async fn list_likes_received(
    pool: &PgPool,
    user_id: i32,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<Liker>, AppError> {
    let (limit, offset) = page_bounds(limit, offset, DEFAULT_LIKES_PAGE_SIZE, MAX_LIKES_PAGE_SIZE)?;
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::not_found("USER_NOT_FOUND", "User not found"));
    }
    let likers = likes::get_likes_received(pool, user_id, limit, offset).await?;
    Ok(likers)
}
