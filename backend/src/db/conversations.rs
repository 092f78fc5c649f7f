use crate::models::{Conversation, ConversationSummary, LastMessage, Message, Participant};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};

/// Create the (user_one, user_two) thread or bump its `updated_at`.
///
/// Callers pass the canonical pair with `user_one_id < user_two_id`.
pub async fn upsert_conversation<'e, E>(executor: E, user_one_id: i32, user_two_id: i32) -> Result<i32>
where
    E: PgExecutor<'e>,
{
    let conversation_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO conversations (user_one_id, user_two_id, created_at, updated_at)
        VALUES ($1, $2, NOW(), NOW())
        ON CONFLICT (user_one_id, user_two_id)
        DO UPDATE SET updated_at = EXCLUDED.updated_at
        RETURNING id
        "#,
    )
    .bind(user_one_id)
    .bind(user_two_id)
    .fetch_one(executor)
    .await?;

    Ok(conversation_id)
}

pub async fn insert_message<'e, E>(executor: E, conversation_id: i32, sender_id: i32, body: &str) -> Result<i32>
where
    E: PgExecutor<'e>,
{
    let message_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO messages (conversation_id, sender_id, body, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING id
        "#,
    )
    .bind(conversation_id)
    .bind(sender_id)
    .bind(body)
    .fetch_one(executor)
    .await?;

    Ok(message_id)
}

pub async fn get_conversation(pool: &PgPool, conversation_id: i32) -> Result<Option<Conversation>> {
    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_one_id, user_two_id, created_at, updated_at
        FROM conversations
        WHERE id = $1
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?;

    Ok(conversation)
}

#[derive(Debug, FromRow)]
struct ConversationRow {
    conversation_id: i32,
    updated_at: DateTime<Utc>,
    other_id: i32,
    other_name: String,
    other_avatar_url: Option<String>,
    last_body: Option<String>,
    last_created_at: Option<DateTime<Utc>>,
    unread_count: i64,
}

impl From<ConversationRow> for ConversationSummary {
    fn from(row: ConversationRow) -> Self {
        let last_message = match (row.last_body, row.last_created_at) {
            (Some(body), Some(created_at)) => Some(LastMessage { body, created_at }),
            _ => None,
        };

        ConversationSummary {
            conversation_id: row.conversation_id,
            other_user: Participant {
                id: row.other_id,
                name: row.other_name,
                avatar_url: row.other_avatar_url,
            },
            last_message,
            unread_count: row.unread_count,
            updated_at: row.updated_at,
        }
    }
}

/// Inbox for a user, most recently active first
pub async fn list_conversations_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<ConversationSummary>> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT
            c.id AS conversation_id,
            c.updated_at,
            u.id AS other_id,
            u.name AS other_name,
            u.avatar_url AS other_avatar_url,
            lm.body AS last_body,
            lm.created_at AS last_created_at,
            (
                SELECT COUNT(*)
                FROM messages m
                WHERE m.conversation_id = c.id
                  AND m.read_at IS NULL
                  AND m.sender_id <> $1
            ) AS unread_count
        FROM conversations c
        JOIN users u ON u.id = CASE WHEN c.user_one_id = $1 THEN c.user_two_id ELSE c.user_one_id END
        LEFT JOIN LATERAL (
            SELECT body, created_at
            FROM messages
            WHERE conversation_id = c.id
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        ) lm ON TRUE
        WHERE c.user_one_id = $1 OR c.user_two_id = $1
        ORDER BY c.updated_at DESC, c.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ConversationSummary::from).collect())
}

/// Stamp `read_at` on the other party's unread messages. Returns rows touched.
pub async fn mark_messages_read(pool: &PgPool, conversation_id: i32, reader_id: i32) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET read_at = NOW()
        WHERE conversation_id = $1
          AND sender_id <> $2
          AND read_at IS NULL
        "#,
    )
    .bind(conversation_id)
    .bind(reader_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_messages(pool: &PgPool, conversation_id: i32) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, sender_id, body, created_at, read_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
