use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{error::AppError, models::Interest, services::profiles, utils::Config};

#[derive(Debug, Deserialize)]
pub struct CreateInterestRequest {
    pub name: String,
}

pub async fn list_interests(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Interest>>, AppError> {
    Ok(Json(profiles::list_interests(&pool).await?))
}

pub async fn create_interest(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<CreateInterestRequest>,
) -> Result<(StatusCode, Json<Interest>), AppError> {
    let interest = profiles::create_interest(&pool, &req.name).await?;
    Ok((StatusCode::CREATED, Json(interest)))
}
