use crate::models::{ScoredCandidate, ScoredPick};
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

/// Replace the (user, date) batch. Run inside a transaction so a failed insert
/// keeps the previous picks.
pub async fn replace_daily_picks(
    conn: &mut PgConnection,
    user_id: i32,
    picked_for_date: NaiveDate,
    picks: &[ScoredCandidate],
) -> Result<u64> {
    let deleted = sqlx::query("DELETE FROM daily_picks WHERE user_id = $1 AND picked_for_date = $2")
        .bind(user_id)
        .bind(picked_for_date)
        .execute(&mut *conn)
        .await?;

    tracing::debug!(
        "Removed {} existing picks for user {} on {}",
        deleted.rows_affected(),
        user_id,
        picked_for_date
    );

    // Inserted one by one so ids follow rank order
    let mut inserted = 0;
    for pick in picks {
        sqlx::query(
            r#"
            INSERT INTO daily_picks (user_id, pick_user_id, score, picked_for_date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(pick.user_id)
        .bind(pick.score)
        .bind(picked_for_date)
        .execute(&mut *conn)
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}

pub async fn get_daily_picks(pool: &PgPool, user_id: i32, picked_for_date: NaiveDate) -> Result<Vec<ScoredPick>> {
    let picks = sqlx::query_as::<_, ScoredPick>(
        r#"
        SELECT
            dp.score,
            u.id, u.name, u.age, u.location, u.bio, u.avatar_url
        FROM daily_picks dp
        JOIN users u ON u.id = dp.pick_user_id
        WHERE dp.user_id = $1 AND dp.picked_for_date = $2
        ORDER BY dp.score DESC, dp.id ASC
        "#,
    )
    .bind(user_id)
    .bind(picked_for_date)
    .fetch_all(pool)
    .await?;

    Ok(picks)
}
