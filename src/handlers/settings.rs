use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthContext;
use crate::db;
use crate::dto::UpdateEmailSettingsRequest;
use crate::error::{AppError, AppResult};
use crate::models::settings::EmailSettings;
use crate::services::validation::from_validator;
use crate::AppState;

pub async fn get_email_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<EmailSettings>> {
    let settings = db::settings::get_email_settings(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Email settings not configured".into()))?;

    Ok(Json(settings))
}

pub async fn update_email_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<UpdateEmailSettingsRequest>,
) -> AppResult<Json<EmailSettings>> {
    body.validate()
        .map_err(|e| AppError::InvalidFields(from_validator(&e)))?;

    let settings = db::settings::upsert_email_settings(
        &state.db,
        auth.user_id,
        body.user_email.trim(),
        body.doctor_email_change(),
        body.report_frequency,
    )
    .await?;

    Ok(Json(settings))
}
