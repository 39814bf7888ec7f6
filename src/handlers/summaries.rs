use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;

use crate::auth::middleware::AuthContext;
use crate::db;
use crate::dto::SummaryResponse;
use crate::error::{AppError, AppResult};
use crate::models::daily_entry::DailySummary;
use crate::services::{compliance, motivation, validation};
use crate::AppState;

/// Validate → score → one coach call → store the summary on the entry.
pub async fn generate_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<SummaryResponse>> {
    let entry = db::entries::get_entry(&state.db, auth.user_id, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No entry for {}", date)))?;

    validation::validate_complete(&entry).map_err(AppError::InvalidFields)?;

    let result = compliance::compute(&entry);
    let input = motivation::build_request(&entry, &result);
    let generated = motivation::request_message(state.generator.as_ref(), &input).await?;

    let summary = DailySummary {
        message: generated.message,
        score: result.score,
    };
    db::entries::set_summary(&state.db, auth.user_id, date, &summary)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No entry for {}", date)))?;

    tracing::info!(user_id = %auth.user_id, date = %date, score = summary.score, "Daily summary generated");

    Ok(Json(SummaryResponse {
        message: summary.message,
        score: summary.score,
        compliance: result,
    }))
}
