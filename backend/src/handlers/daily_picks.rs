use axum::{extract::State, response::Json};
use sqlx::PgPool;

use super::auth::CurrentUser;
use crate::{
    error::AppError,
    models::{RefreshOutcome, ScoredPick},
    services::recommendations,
    utils::Config,
};

pub async fn refresh_daily_picks(
    CurrentUser(user_id): CurrentUser,
    State((pool, config)): State<(PgPool, Config)>,
) -> Result<Json<RefreshOutcome>, AppError> {
    let outcome = recommendations::refresh_daily_picks(&pool, user_id, config.picks_timezone).await?;
    Ok(Json(outcome))
}

pub async fn get_daily_picks(
    CurrentUser(user_id): CurrentUser,
    State((pool, config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<ScoredPick>>, AppError> {
    let picks = recommendations::get_daily_picks(&pool, user_id, config.picks_timezone).await?;
    Ok(Json(picks))
}
