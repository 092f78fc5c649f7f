use crate::models::{Liker, MatchedUser};
use anyhow::Result;
use sqlx::{PgExecutor, PgPool};

/// Record a like edge. Returns false when the edge already existed.
pub async fn insert_like<'e, E>(executor: E, liker_id: i32, liked_id: i32) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let inserted = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO likes (liker_id, liked_id)
        VALUES ($1, $2)
        ON CONFLICT (liker_id, liked_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(liker_id)
    .bind(liked_id)
    .fetch_optional(executor)
    .await?;

    Ok(inserted.is_some())
}

pub async fn like_exists<'e, E>(executor: E, liker_id: i32, liked_id: i32) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE liker_id = $1 AND liked_id = $2)",
    )
    .bind(liker_id)
    .bind(liked_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

/// True when both a→b and b→a edges exist
pub async fn is_mutual_match<'e, E>(executor: E, user_a: i32, user_b: i32) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let edges = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM likes
        WHERE (liker_id = $1 AND liked_id = $2)
           OR (liker_id = $2 AND liked_id = $1)
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_one(executor)
    .await?;

    Ok(edges == 2)
}

/// Mutual matches of a user via a self-join on reversed edges.
///
/// `matched_at` is the later of the two edges. Ordered by `matched_at`, then user id.
pub async fn get_mutual_matches(pool: &PgPool, user_id: i32) -> Result<Vec<MatchedUser>> {
    let matches = sqlx::query_as::<_, MatchedUser>(
        r#"
        SELECT
            u.id, u.name, u.age, u.location, u.bio, u.avatar_url,
            GREATEST(l.created_at, r.created_at) AS matched_at
        FROM likes l
        JOIN likes r ON r.liker_id = l.liked_id AND r.liked_id = l.liker_id
        JOIN users u ON u.id = l.liked_id
        WHERE l.liker_id = $1
        ORDER BY matched_at ASC, u.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(matches)
}

pub async fn get_likes_received(pool: &PgPool, user_id: i32, limit: i64, offset: i64) -> Result<Vec<Liker>> {
    let likers = sqlx::query_as::<_, Liker>(
        r#"
        SELECT
            u.id, u.name, u.age, u.location, u.bio, u.avatar_url,
            l.created_at AS liked_at
        FROM likes l
        JOIN users u ON u.id = l.liker_id
        WHERE l.liked_id = $1
        ORDER BY l.created_at DESC, l.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(likers)
}

pub async fn count_likes_received(pool: &PgPool, user_id: i32) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE liked_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
