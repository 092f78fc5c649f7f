use crate::models::{NewUser, User, UserSummary, UserUpdate};
use anyhow::Result;
use sqlx::{PgExecutor, PgPool};

// User operations
pub async fn create_user(pool: &PgPool, new_user: &NewUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, age, location, bio, avatar_url, world_username)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, age, location, bio, avatar_url, world_address, world_username,
                  created_at, updated_at
        "#,
    )
    .bind(new_user.name.trim())
    .bind(new_user.age)
    .bind(new_user.location.trim())
    .bind(new_user.bio.as_deref())
    .bind(new_user.avatar_url.as_deref())
    .bind(new_user.world_username.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id<'e, E>(executor: E, user_id: i32) -> Result<Option<User>>
where
    E: PgExecutor<'e>,
{
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, age, location, bio, avatar_url, world_address, world_username,
               created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn user_exists<'e, E>(executor: E, user_id: i32) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await?;

    Ok(exists)
}

/// Look up a user by an already-normalized (lowercase) world address
pub async fn get_user_by_world_address(pool: &PgPool, world_address: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, age, location, bio, avatar_url, world_address, world_username,
               created_at, updated_at
        FROM users
        WHERE world_address = $1
        "#,
    )
    .bind(world_address)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Set the world address only if none is linked yet.
///
/// Returns `None` when the user is missing or already has an address.
pub async fn link_world_address(pool: &PgPool, user_id: i32, world_address: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET world_address = $2, updated_at = NOW()
        WHERE id = $1 AND world_address IS NULL
        RETURNING id, name, age, location, bio, avatar_url, world_address, world_username,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(world_address)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Apply a partial edit and bump `updated_at`. Returns `None` for an unknown user.
pub async fn update_user(pool: &PgPool, user_id: i32, update: &UserUpdate) -> Result<Option<User>> {
    let bio = update.bio.as_deref().map(str::trim);
    let avatar_url = update.avatar_url.as_deref().map(str::trim);

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            age = COALESCE($3, age),
            location = COALESCE($4, location),
            bio = CASE WHEN $5 THEN NULLIF($6, '') ELSE bio END,
            avatar_url = CASE WHEN $7 THEN NULLIF($8, '') ELSE avatar_url END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, age, location, bio, avatar_url, world_address, world_username,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(update.name.as_deref().map(str::trim))
    .bind(update.age)
    .bind(update.location.as_deref().map(str::trim))
    .bind(bio.is_some())
    .bind(bio)
    .bind(avatar_url.is_some())
    .bind(avatar_url)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Newest users first, optionally filtered by a name/location `ILIKE` pattern
pub async fn search_users(pool: &PgPool, pattern: Option<&str>, limit: i64, offset: i64) -> Result<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, name, age, location, bio, avatar_url
        FROM users
        WHERE $1::TEXT IS NULL OR name ILIKE $1 OR location ILIKE $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn list_user_ids(pool: &PgPool) -> Result<Vec<i32>> {
    let ids = sqlx::query_scalar::<_, i32>("SELECT id FROM users ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(ids)
}
