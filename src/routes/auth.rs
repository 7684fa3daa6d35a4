use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::context::RequestContext;
use crate::errors::{AppError, AppResult};
use crate::jwt::TokenType;
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub context: RequestContext,
    pub user: User,
}

/// Exchanges a refresh token for a new pair. The access token carries a
/// freshly computed permission snapshot.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let claims = state.tokens.verify_token(&payload.refresh_token, TokenType::Refresh)?;

    let user = match state.users.get_by_id(claims.sub).await {
        Ok(user) => user,
        Err(err) if err.is_not_found() => return Err(AppError::unauthorized("user no longer exists")),
        Err(err) => return Err(err),
    };

    let access_token = state.tokens.access_token(&user).await?;
    let refresh_token = state.tokens.refresh_token(&user)?;

    tracing::info!(user_id = user.id, "tokens refreshed");

    Ok(Json(TokenPair {
        access_token,
        refresh_token,
    }))
}

pub async fn session(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Json<SessionResponse>> {
    let user_id = ctx.user_id.ok_or_else(AppError::user_not_found)?;
    let user = state.users.get_by_id(user_id).await?;

    Ok(Json(SessionResponse { context: ctx, user }))
}
