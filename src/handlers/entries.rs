use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;

use crate::auth::middleware::AuthContext;
use crate::db;
use crate::dto::EntryRangeQuery;
use crate::error::{AppError, AppResult};
use crate::models::daily_entry::{DailyEntry, DailyEntryPatch};
use crate::services::compliance::{self, ComplianceResult};
use crate::services::validation::validate_patch;
use crate::AppState;

pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(date): Path<NaiveDate>,
    Json(patch): Json<DailyEntryPatch>,
) -> AppResult<Json<DailyEntry>> {
    validate_patch(&patch).map_err(AppError::InvalidFields)?;

    let entry = db::entries::upsert_entry(&state.db, auth.user_id, date, &patch).await?;
    tracing::info!(user_id = %auth.user_id, date = %date, "Daily entry saved");

    Ok(Json(entry))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<DailyEntry>> {
    let entry = db::entries::get_entry(&state.db, auth.user_id, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No entry for {}", date)))?;

    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<EntryRangeQuery>,
) -> AppResult<Json<Vec<DailyEntry>>> {
    let (start, end) = query.resolve_now().map_err(AppError::Validation)?;
    let entries = db::entries::list_entries(&state.db, auth.user_id, start, end).await?;

    Ok(Json(entries))
}

/// Score preview without calling the coach.
pub async fn get_compliance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<ComplianceResult>> {
    let entry = db::entries::get_entry(&state.db, auth.user_id, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No entry for {}", date)))?;

    Ok(Json(compliance::compute(&entry)))
}
