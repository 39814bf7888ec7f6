use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};

use crate::auth::middleware::AuthContext;
use crate::db;
use crate::dto::EntryRangeQuery;
use crate::error::{AppError, AppResult};
use crate::services::reports::{self, WeeklyTrend};
use crate::AppState;

pub async fn weekly_trends(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<EntryRangeQuery>,
) -> AppResult<Json<Vec<WeeklyTrend>>> {
    let (start, end) = query.resolve_now().map_err(AppError::Validation)?;
    let entries = db::entries::list_entries(&state.db, auth.user_id, start, end).await?;

    Ok(Json(reports::weekly_trends(&entries)))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<EntryRangeQuery>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = query.resolve_now().map_err(AppError::Validation)?;
    let entries = db::entries::list_entries(&state.db, auth.user_id, start, end).await?;
    let csv = reports::write_csv(&entries)?;

    tracing::info!(user_id = %auth.user_id, rows = entries.len(), "CSV report exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"health_report.csv\"",
            ),
        ],
        csv,
    ))
}
