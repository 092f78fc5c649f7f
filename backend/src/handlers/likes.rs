use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use sqlx::PgPool;

use super::auth::CurrentUser;
use crate::{
    error::AppError,
    models::{AffinityOutcome, Liker, MatchedUser},
    services::{matching, MatchSubject},
    utils::Config,
};

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub liked_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct LikesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    /// Look up matches of the user owning this world address instead of the caller
    pub address: Option<String>,
}

pub async fn record_like(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<LikeRequest>,
) -> Result<(StatusCode, Json<AffinityOutcome>), AppError> {
    let outcome = matching::record_affinity(&pool, user_id, req.liked_id).await?;
    let status = if outcome.is_new_edge { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(outcome)))
}

pub async fn list_likes_received(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Query(params): Query<LikesQuery>,
) -> Result<Json<Vec<Liker>>, AppError> {
    Ok(Json(matching::list_likes_received(&pool, user_id, params.limit, params.offset).await?))
}

pub async fn get_matches(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Query(params): Query<MatchesQuery>,
) -> Result<Json<Vec<MatchedUser>>, AppError> {
    let subject = match params.address {
        Some(address) => MatchSubject::Address(address),
        None => MatchSubject::Id(user_id),
    };
    Ok(Json(matching::get_matches(&pool, &subject).await?))
}
