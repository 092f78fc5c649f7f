//! Identity-store and interest-graph operations the matching core reads from.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::PgPool;
use tracing::info;

use crate::constants::{
    is_valid_age, BIO_CHAR_LIMIT, DEFAULT_USERS_PAGE_SIZE, MAX_USERS_PAGE_SIZE, MAX_USER_AGE, MIN_USER_AGE,
};
use crate::db::{interests, likes, users};
use crate::error::{is_unique_violation, AppError};
use crate::models::{Interest, NewUser, User, UserProfile, UserSummary, UserUpdate};
use crate::utils::{normalize_world_address, page_bounds};

static AVATAR_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("avatar url regex"));

fn check_age(age: i32) -> Result<(), AppError> {
    if !is_valid_age(age) {
        return Err(AppError::validation(
            "INVALID_AGE",
            format!("Age must be between {} and {}", MIN_USER_AGE, MAX_USER_AGE),
        ));
    }
    Ok(())
}

fn check_bio(bio: &str) -> Result<(), AppError> {
    if bio.chars().count() > BIO_CHAR_LIMIT {
        return Err(AppError::validation(
            "BIO_TOO_LONG",
            format!("Bio cannot exceed {} characters", BIO_CHAR_LIMIT),
        ));
    }
    Ok(())
}

fn check_avatar_url(url: &str) -> Result<(), AppError> {
    if !AVATAR_URL_RE.is_match(url) {
        return Err(AppError::validation("INVALID_URL_FORMAT", "Avatar URL must be an http(s) URL"));
    }
    Ok(())
}

pub fn validate_new_user(new_user: &NewUser) -> Result<(), AppError> {
    if new_user.name.trim().is_empty() {
        return Err(AppError::validation("MISSING_NAME", "Name is required"));
    }
    check_age(new_user.age)?;
    if new_user.location.trim().is_empty() {
        return Err(AppError::validation("MISSING_LOCATION", "Location is required"));
    }
    if let Some(bio) = &new_user.bio {
        check_bio(bio)?;
    }
    if let Some(url) = &new_user.avatar_url {
        check_avatar_url(url)?;
    }
    Ok(())
}

/// Checks only the fields present; blank bio/avatar means "clear"
pub fn validate_user_update(update: &UserUpdate) -> Result<(), AppError> {
    if update.is_empty() {
        return Err(AppError::validation("NO_UPDATES", "No valid fields to update"));
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("INVALID_NAME", "Name must be a non-empty string"));
        }
    }
    if let Some(age) = update.age {
        check_age(age)?;
    }
    if let Some(location) = &update.location {
        if location.trim().is_empty() {
            return Err(AppError::validation("INVALID_LOCATION", "Location must be a non-empty string"));
        }
    }
    if let Some(bio) = &update.bio {
        check_bio(bio.trim())?;
    }
    if let Some(url) = update.avatar_url.as_deref().map(str::trim) {
        if !url.is_empty() {
            check_avatar_url(url)?;
        }
    }
    Ok(())
}

/// `ILIKE` pattern for a substring search, with wildcards in the term escaped
pub fn search_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

pub async fn create_user(pool: &PgPool, new_user: &NewUser) -> Result<User, AppError> {
    validate_new_user(new_user)?;
    let user = users::create_user(pool, new_user).await?;
    info!("Created user {}", user.id);
    Ok(user)
}

pub async fn update_profile(pool: &PgPool, user_id: i32, update: &UserUpdate) -> Result<User, AppError> {
    validate_user_update(update)?;
    let user = users::update_user(pool, user_id, update)
        .await?
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))?;
    info!("Updated profile of user {}", user.id);
    Ok(user)
}

pub async fn search_users(
    pool: &PgPool,
    term: Option<&str>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<UserSummary>, AppError> {
    let (limit, offset) = page_bounds(limit, offset, DEFAULT_USERS_PAGE_SIZE, MAX_USERS_PAGE_SIZE)?;
    let pattern = search_pattern(term);
    let found = users::search_users(pool, pattern.as_deref(), limit, offset).await?;
    Ok(found)
}

pub async fn get_profile(pool: &PgPool, user_id: i32) -> Result<UserProfile, AppError> {
    let user = users::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))?;
    let interests = interests::get_user_interests(pool, user.id).await?;
    Ok(UserProfile { user, interests, likes_received: None })
}

pub async fn get_profile_by_world_address(pool: &PgPool, raw_address: &str) -> Result<UserProfile, AppError> {
    let address = normalize_world_address(raw_address)?;
    let user = users::get_user_by_world_address(pool, &address)
        .await?
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))?;
    let interests = interests::get_user_interests(pool, user.id).await?;
    let likes_received = likes::count_likes_received(pool, user.id).await?;
    Ok(UserProfile { user, interests, likes_received: Some(likes_received) })
}

/// Attach a world address to a user. The address can be set once and never changed.
pub async fn link_world_address(pool: &PgPool, user_id: i32, raw_address: &str) -> Result<User, AppError> {
    let address = normalize_world_address(raw_address)?;

    if let Some(owner) = users::get_user_by_world_address(pool, &address).await? {
        if owner.id == user_id {
            return Ok(owner);
        }
        return Err(AppError::conflict("ADDRESS_TAKEN", "Address is linked to another user"));
    }

    match users::link_world_address(pool, user_id, &address).await {
        Ok(Some(user)) => {
            info!("Linked world address {} to user {}", address, user_id);
            Ok(user)
        }
        Ok(None) => match users::get_user_by_id(pool, user_id).await? {
            None => Err(AppError::not_found("USER_NOT_FOUND", "User not found")),
            Some(_) => Err(AppError::conflict("ADDRESS_ALREADY_SET", "World address cannot be changed once set")),
        },
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::conflict("ADDRESS_TAKEN", "Address is linked to another user"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_interests(pool: &PgPool) -> Result<Vec<Interest>, AppError> {
    let all = interests::list_interests(pool).await?;
    Ok(all)
}

pub async fn create_interest(pool: &PgPool, name: &str) -> Result<Interest, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("INVALID_NAME", "Name cannot be empty"));
    }

    match interests::create_interest(pool, name).await {
        Ok(interest) => Ok(interest),
        Err(e) if is_unique_violation(&e) => Err(AppError::conflict(
            "DUPLICATE_NAME",
            "An interest with this name already exists",
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_user_interests(pool: &PgPool, user_id: i32) -> Result<Vec<Interest>, AppError> {
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::not_found("USER_NOT_FOUND", "User not found"));
    }
    let declared = interests::get_user_interests(pool, user_id).await?;
    Ok(declared)
}

/// Sorted, de-duplicated interest ids; rejects empty or non-positive input
pub fn normalize_interest_ids(interest_ids: &[i32]) -> Result<Vec<i32>, AppError> {
    if interest_ids.is_empty() {
        return Err(AppError::validation("INVALID_INTEREST_IDS", "Valid interestIds array is required"));
    }
    if interest_ids.iter().any(|id| *id <= 0) {
        return Err(AppError::validation("INVALID_INTEREST_ID_FORMAT", "Interest ids must be positive integers"));
    }
    let mut ids = interest_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Replace the user's whole interest set. Returns the number of tags stored.
pub async fn replace_user_interests(pool: &PgPool, user_id: i32, interest_ids: &[i32]) -> Result<usize, AppError> {
    let ids = normalize_interest_ids(interest_ids)?;

    let mut tx = pool.begin().await?;
    if !users::user_exists(&mut *tx, user_id).await? {
        return Err(AppError::not_found("USER_NOT_FOUND", "User not found"));
    }
    let existing = interests::count_existing_interests(&mut *tx, &ids).await?;
    if existing != ids.len() as i64 {
        return Err(AppError::not_found("INTERESTS_NOT_FOUND", "One or more interests not found"));
    }
    interests::replace_user_interests(&mut tx, user_id, &ids).await?;
    tx.commit().await?;

    Ok(ids.len())
}
