use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::chat::{chat_title, ChatMessage, ChatSession};

pub async fn list_sessions(db: &PgPool, user_id: Uuid) -> Result<Vec<ChatSession>, sqlx::Error> {
    sqlx::query_as::<_, ChatSession>(
        r#"
        SELECT id, title, updated_at FROM chat_sessions
        WHERE user_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// `None` when the chat does not exist or belongs to someone else.
pub async fn load_messages(
    db: &PgPool,
    user_id: Uuid,
    chat_id: Uuid,
) -> Result<Option<Vec<ChatMessage>>, sqlx::Error> {
    let messages = sqlx::query_scalar::<_, Json<Vec<ChatMessage>>>(
        "SELECT messages FROM chat_sessions WHERE id = $1 AND user_id = $2",
    )
    .bind(chat_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(messages.map(|m| m.0))
}

/// Writes the full message list. A `None` chat id starts a new session titled after
/// the first user message; the id of the written session is returned.
pub async fn save_messages(
    db: &PgPool,
    user_id: Uuid,
    chat_id: Option<Uuid>,
    messages: &[ChatMessage],
) -> Result<Uuid, sqlx::Error> {
    if let Some(chat_id) = chat_id {
        sqlx::query(
            r#"
            UPDATE chat_sessions SET messages = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .bind(Json(messages))
        .execute(db)
        .await?;
        return Ok(chat_id);
    }

    let chat_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO chat_sessions (id, user_id, title, messages)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .bind(chat_title(messages))
    .bind(Json(messages))
    .execute(db)
    .await?;

    Ok(chat_id)
}
