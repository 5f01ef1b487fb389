use axum::{extract::State, Json};
use serde_json::Value;

use super::ApiResult;
use crate::database::models::Credentials;
use crate::error::ApiError;
use crate::middleware::JsonBody;
use crate::params;
use crate::state::AppState;

const CREDENTIALS_MATCH_SQL: &str =
    "SELECT COUNT(*) AS count FROM users WHERE email = :email AND password = :password";

/// POST /login - Exchange email + password for a signed token
///
/// Runs behind the login gate (email shape, account exists, password shape).
/// Answers with the bare token string.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<String> {
    let rows = state
        .db
        .select(
            CREDENTIALS_MATCH_SQL,
            &params! { "email" => credentials.email, "password" => credentials.password },
        )
        .await?;

    let count = rows
        .first()
        .and_then(|row| row.get("count"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if count != 1 {
        tracing::warn!("Login rejected for {}", credentials.email);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&credentials.email)?;
    tracing::info!("Issued token for {}", credentials.email);
    Ok(Json(token))
}
