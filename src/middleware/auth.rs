use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{token_from_header, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying `<scheme> <jwt>`
pub const TOKEN_HEADER: &str = "token";

/// Authenticated identity extracted from the token. Identity is the email only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

/// Token authentication middleware that verifies the `token` header and
/// injects [`AuthUser`] into the request
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected token on {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser { email: claims.email });

    Ok(next.run(request).await)
}

/// Extract the JWT from the `token` header
fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(TOKEN_HEADER)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Missing)?;

    token_from_header(value).ok_or(TokenError::Missing)
}
