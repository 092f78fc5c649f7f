//! Conversation gate and thread store.
//!
//! A thread can only be opened (or written to) by two users who like each
//! other at the time of the write.

use sqlx::PgPool;
use tracing::info;

use crate::constants::MESSAGE_BODY_CHAR_LIMIT;
use crate::db::{conversations, likes, users};
use crate::error::AppError;
use crate::models::{ConversationSummary, Message, SentMessage};

/// Order a participant pair as (smaller id, larger id)
pub fn canonical_pair(a: i32, b: i32) -> (i32, i32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Trim and bound a message body, returning the text to store
pub fn validate_body(body: &str) -> Result<&str, AppError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("MISSING_BODY", "Message body is required"));
    }
    if trimmed.chars().count() > MESSAGE_BODY_CHAR_LIMIT {
        return Err(AppError::validation(
            "BODY_TOO_LONG",
            format!("Message body cannot exceed {} characters", MESSAGE_BODY_CHAR_LIMIT),
        ));
    }
    Ok(trimmed)
}

/// Checks that need no datastore access
pub fn validate_send(sender_id: i32, recipient_id: i32, body: &str) -> Result<&str, AppError> {
    if sender_id == recipient_id {
        return Err(AppError::validation("SAME_USER", "Sender and recipient cannot be the same user"));
    }
    validate_body(body)
}

pub async fn send_message(
    pool: &PgPool,
    sender_id: i32,
    recipient_id: i32,
    body: &str,
) -> Result<SentMessage, AppError> {
    let body = validate_send(sender_id, recipient_id, body)?;

    let mut tx = pool.begin().await?;

    if !users::user_exists(&mut *tx, sender_id).await? {
        return Err(AppError::not_found("SENDER_NOT_FOUND", "Sender not found"));
    }
    if !users::user_exists(&mut *tx, recipient_id).await? {
        return Err(AppError::not_found("RECIPIENT_NOT_FOUND", "Recipient not found"));
    }
    if !likes::is_mutual_match(&mut *tx, sender_id, recipient_id).await? {
        return Err(AppError::NotMutualMatch);
    }

    let (user_one_id, user_two_id) = canonical_pair(sender_id, recipient_id);
    let conversation_id = conversations::upsert_conversation(&mut *tx, user_one_id, user_two_id).await?;
    let message_id = conversations::insert_message(&mut *tx, conversation_id, sender_id, body).await?;

    tx.commit().await?;

    info!(
        "✉️ User {} sent message {} in conversation {}",
        sender_id, message_id, conversation_id
    );

    Ok(SentMessage { conversation_id, message_id })
}

pub async fn list_conversations(pool: &PgPool, user_id: i32) -> Result<Vec<ConversationSummary>, AppError> {
    let summaries = conversations::list_conversations_for_user(pool, user_id).await?;
    Ok(summaries)
}

/// Messages in chat order. With `mark_read`, the other party's unread
/// messages are stamped first.
pub async fn list_messages(
    pool: &PgPool,
    conversation_id: i32,
    user_id: i32,
    mark_read: bool,
) -> Result<Vec<Message>, AppError> {
    let conversation = conversations::get_conversation(pool, conversation_id)
        .await?
        .ok_or_else(|| AppError::not_found("CONVERSATION_NOT_FOUND", "Conversation not found"))?;

    if !conversation.has_participant(user_id) {
        return Err(AppError::forbidden(
            "NOT_CONVERSATION_PARTICIPANT",
            "User is not a participant in this conversation",
        ));
    }

    if mark_read {
        let marked = conversations::mark_messages_read(pool, conversation_id, user_id).await?;
        if marked > 0 {
            tracing::debug!("Marked {} messages read in conversation {} for user {}", marked, conversation_id, user_id);
        }
    }

    let messages = conversations::list_messages(pool, conversation_id).await?;
    Ok(messages)
}
