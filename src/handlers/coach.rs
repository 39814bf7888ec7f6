use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthContext;
use crate::db;
use crate::dto::{ChatMessagesResponse, CoachMessageRequest, CoachMessageResponse};
use crate::error::{AppError, AppResult};
use crate::models::chat::{ChatMessage, ChatSession};
use crate::services::coach;
use crate::services::validation::from_validator;
use crate::AppState;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<CoachMessageRequest>,
) -> AppResult<Json<CoachMessageResponse>> {
    body.validate()
        .map_err(|e| AppError::InvalidFields(from_validator(&e)))?;
    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("Message must not be blank".into()));
    }

    let mut history = match body.chat_id {
        Some(chat_id) => db::chats::load_messages(&state.db, auth.user_id, chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat not found".into()))?,
        None => Vec::new(),
    };

    let reply = coach::converse(state.generator.as_ref(), &history, message).await;

    history.push(ChatMessage::user(message));
    history.push(ChatMessage::model(reply.clone()));
    let chat_id = db::chats::save_messages(&state.db, auth.user_id, body.chat_id, &history).await?;

    tracing::debug!(user_id = %auth.user_id, chat_id = %chat_id, turns = history.len(), "Coach reply stored");

    Ok(Json(CoachMessageResponse { chat_id, reply }))
}

pub async fn list_chats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<ChatSession>>> {
    let sessions = db::chats::list_sessions(&state.db, auth.user_id).await?;
    Ok(Json(sessions))
}

/// Unknown chats read as empty rather than 404.
pub async fn get_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(chat_id): Path<Uuid>,
) -> AppResult<Json<ChatMessagesResponse>> {
    let messages = db::chats::load_messages(&state.db, auth.user_id, chat_id)
        .await?
        .unwrap_or_default();

    Ok(Json(ChatMessagesResponse { chat_id, messages }))
}
