use axum::{extract::FromRequestParts, http::request::Parts};

use crate::constants::USER_ID_HEADER;
use crate::error::AppError;

/// The caller's user id, as resolved by the upstream wallet-auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i32);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AppError::Unauthenticated)?;

        let user_id = value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::validation("INVALID_USER_ID", format!("{} must be a positive integer", USER_ID_HEADER))
            })?;

        Ok(CurrentUser(user_id))
    }
}
