use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

const TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Listing shape for GET /api/chats
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// Title for a new session: the first user message, cut to 40 characters.
pub fn chat_title(messages: &[ChatMessage]) -> String {
    let Some(first) = messages
        .iter()
        .find(|m| m.role == ChatRole::User && !m.text.trim().is_empty())
    else {
        return "New Chat".to_string();
    };

    let text = first.text.trim();
    if text.chars().count() > TITLE_MAX_CHARS {
        let cut: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
