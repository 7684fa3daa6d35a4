//! Authentication stage.
//!
//! Resolves the principal from an `Authorization: Bearer <token>` header. Any
//! failure (bad signature, expiry, wrong token type, unknown user) leaves the
//! request anonymous instead of rejecting it; the authorization stages further
//! down decide whether anonymity is acceptable.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::app::AppState;
use crate::context::RequestContext;
use crate::errors::AppResult;
use crate::jwt::TokenType;
use crate::models::User;

pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match resolve_user(&state, &token).await {
        Ok(user) => {
            let ctx = RequestContext::from_extensions(request.extensions())
                .with_principal(user.id, user.is_superuser);
            tracing::debug!(user_id = user.id, is_superuser = user.is_superuser, "request authenticated");
            request.extensions_mut().insert(ctx);
        }
        Err(err) => {
            tracing::debug!(error = %err, "authentication failed, continuing anonymously");
        }
    }

    next.run(request).await
}

async fn resolve_user(state: &AppState, token: &str) -> AppResult<User> {
    let claims = state.tokens.verify_token(token, TokenType::Access)?;
    state.users.get_by_id(claims.sub).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def".to_string()));
        assert_eq!(bearer_token(&headers("bearer  abc")), Some("abc".to_string()));
    }

    #[test]
    fn ignores_other_schemes() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
