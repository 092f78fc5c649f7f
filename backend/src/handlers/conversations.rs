use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use sqlx::PgPool;

use super::auth::CurrentUser;
use crate::{
    error::AppError,
    models::{ConversationSummary, Message, SentMessage},
    services::messaging,
    utils::Config,
};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: i32,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub mark_read: bool,
}

pub async fn send_message(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SentMessage>), AppError> {
    let sent = messaging::send_message(&pool, user_id, req.recipient_id, &req.body).await?;
    Ok((StatusCode::CREATED, Json(sent)))
}

pub async fn list_conversations(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    Ok(Json(messaging::list_conversations(&pool, user_id).await?))
}

pub async fn list_messages(
    CurrentUser(user_id): CurrentUser,
    State((pool, _config)): State<(PgPool, Config)>,
    Path(conversation_id): Path<i32>,
    Query(params): Query<MessagesQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = messaging::list_messages(&pool, conversation_id, user_id, params.mark_read).await?;
    Ok(Json(messages))
}
