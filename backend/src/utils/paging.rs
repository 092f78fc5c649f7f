use crate::error::AppError;

/// Resolve optional paging parameters to (limit, offset).
///
/// Oversized limits are capped at `max_limit` rather than rejected.
pub fn page_bounds(
    limit: Option<i64>,
    offset: Option<i64>,
    default_limit: i64,
    max_limit: i64,
) -> Result<(i64, i64), AppError> {
    let limit = match limit {
        None => default_limit,
        Some(l) if l < 1 => {
            return Err(AppError::validation("INVALID_LIMIT", "Limit must be a positive integer"));
        }
        Some(l) => l.min(max_limit),
    };
    let offset = match offset {
        None => 0,
        Some(o) if o < 0 => {
            return Err(AppError::validation("INVALID_OFFSET", "Offset must be a non-negative integer"));
        }
        Some(o) => o,
    };
    Ok((limit, offset))
}
