use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::auth::CurrentUser;
use crate::{
    error::AppError,
    models::{Interest, NewUser, User, UserProfile, UserSummary, UserUpdate},
    services::profiles,
    utils::Config,
};

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    /// Substring matched against name and location
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LinkAddressRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceInterestsRequest {
    pub interest_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceInterestsResponse {
    pub count: usize,
}

pub async fn create_user(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = profiles::create_user(&pool, &req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State((pool, _config)): State<(PgPool, Config)>,
    Query(params): Query<UsersQuery>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let found = profiles::search_users(&pool, params.search.as_deref(), params.limit, params.offset).await?;
    Ok(Json(found))
}

pub async fn update_me(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(profiles::update_profile(&pool, user_id, &req).await?))
}

pub async fn get_user(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(profiles::get_profile(&pool, user_id).await?))
}

pub async fn get_user_by_world_address(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(address): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(profiles::get_profile_by_world_address(&pool, &address).await?))
}

pub async fn link_world_address(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<LinkAddressRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(profiles::link_world_address(&pool, user_id, &req.address).await?))
}

pub async fn get_my_interests(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Interest>>, AppError> {
    Ok(Json(profiles::get_user_interests(&pool, user_id).await?))
}

pub async fn replace_my_interests(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<ReplaceInterestsRequest>,
) -> Result<Json<ReplaceInterestsResponse>, AppError> {
    let count = profiles::replace_user_interests(&pool, user_id, &req.interest_ids).await?;
    Ok(Json(ReplaceInterestsResponse { count }))
}
