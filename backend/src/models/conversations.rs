use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: i32,
    pub user_one_id: i32,
    pub user_two_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: i32) -> bool {
        self.user_one_id == user_id || self.user_two_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentMessage {
    pub conversation_id: i32,
    pub message_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub id: i32,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastMessage {
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Inbox entry for one conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: i32,
    pub other_user: Participant,
    pub last_message: Option<LastMessage>,
    pub unread_count: i64,
    pub updated_at: DateTime<Utc>,
}
