use axum::{
    extract::State,
    Json,
};

use super::ApiResult;
use crate::database::models::{from_rows, Credentials, MutationResult, PasswordChange, User};
use crate::database::{ListQuery, Params};
use crate::middleware::{JsonBody, PathParam, QueryParam};
use crate::params;
use crate::state::AppState;

/// GET /users - List users (paginated with `limit` + positive `offset`)
pub async fn list(
    State(state): State<AppState>,
    QueryParam(query): QueryParam<ListQuery>,
) -> ApiResult<Vec<User>> {
    let mut sql = String::from("SELECT id, email, password FROM users");
    let mut params = Params::new();
    query.paginate(&mut sql, &mut params);

    let rows = state.db.select(&sql, &params).await?;
    Ok(Json(from_rows(rows)?))
}

/// POST /user - Sign up
///
/// Runs behind the signup gate. The email is stored lowercased; the response
/// echoes the new user with its generated id.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(mut credentials): JsonBody<Credentials>,
) -> ApiResult<User> {
    credentials.email = credentials.email.to_lowercase();

    let id = state
        .db
        .insert(
            "INSERT INTO users (email, password) VALUES (:email, :password) RETURNING id",
            &params! { "email" => credentials.email, "password" => credentials.password },
        )
        .await?;

    tracing::info!("Created user {} ({})", id, credentials.email);
    Ok(Json(credentials.into_user(id)))
}

/// PATCH /changepassword/:id - Replace a user's password
///
/// Any valid token may change any user's password.
pub async fn change_password(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(change): JsonBody<PasswordChange>,
) -> ApiResult<MutationResult> {
    let affected = state
        .db
        .update(
            "UPDATE users SET password = :password WHERE id = :id",
            &params! { "password" => change.password, "id" => id },
        )
        .await?;

    Ok(Json(affected.into()))
}
