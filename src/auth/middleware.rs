use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::AppState;

/// Who is calling. Inserted as a request extension by [`require_auth`] and passed
/// explicitly to every handler.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub session_valid: bool,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(token, &state.config)?;

    let context = AuthContext {
        user_id: token_data.claims.sub,
        email: token_data.claims.email.filter(|e| !e.is_empty()),
        session_valid: true,
    };

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}
