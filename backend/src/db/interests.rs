use crate::models::{Interest, InterestSet};
use anyhow::Result;
use sqlx::{PgConnection, PgExecutor, PgPool};

pub async fn list_interests(pool: &PgPool) -> Result<Vec<Interest>> {
    let interests = sqlx::query_as::<_, Interest>("SELECT id, name FROM interests ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    Ok(interests)
}

pub async fn create_interest(pool: &PgPool, name: &str) -> Result<Interest> {
    let interest = sqlx::query_as::<_, Interest>(
        "INSERT INTO interests (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(interest)
}

/// Insert a tag unless it already exists. Returns whether a row was added.
pub async fn ensure_interest(pool: &PgPool, name: &str) -> Result<bool> {
    let result = sqlx::query("INSERT INTO interests (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_existing_interests<'e, E>(executor: E, interest_ids: &[i32]) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interests WHERE id = ANY($1)")
        .bind(interest_ids)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

pub async fn get_user_interests(pool: &PgPool, user_id: i32) -> Result<Vec<Interest>> {
    let interests = sqlx::query_as::<_, Interest>(
        r#"
        SELECT i.id, i.name
        FROM user_interests ui
        JOIN interests i ON i.id = ui.interest_id
        WHERE ui.user_id = $1
        ORDER BY i.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(interests)
}

/// Delete every tag of the user and insert the given set. Run inside a transaction.
pub async fn replace_user_interests(conn: &mut PgConnection, user_id: i32, interest_ids: &[i32]) -> Result<u64> {
    sqlx::query("DELETE FROM user_interests WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query(
        r#"
        INSERT INTO user_interests (user_id, interest_id)
        SELECT $1, interest_id FROM UNNEST($2::INTEGER[]) AS t(interest_id)
        "#,
    )
    .bind(user_id)
    .bind(interest_ids)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Interest-tag ids of every user, in one grouped query
pub async fn get_all_interest_sets(pool: &PgPool) -> Result<Vec<InterestSet>> {
    let sets = sqlx::query_as::<_, InterestSet>(
        r#"
        SELECT u.id AS user_id,
               COALESCE(
                   array_agg(ui.interest_id ORDER BY ui.interest_id)
                       FILTER (WHERE ui.interest_id IS NOT NULL),
                   ARRAY[]::INTEGER[]
               ) AS interest_ids
        FROM users u
        LEFT JOIN user_interests ui ON ui.user_id = u.id
        GROUP BY u.id
        ORDER BY u.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(sets)
}
