use axum::{
    extract::{Extension, State},
    Json,
};

use super::ApiResult;
use crate::database::models::{from_rows, MutationResult, NewOrder, Order};
use crate::database::ListQuery;
use crate::middleware::{AuthUser, JsonBody, PathParam, QueryParam};
use crate::params;
use crate::state::AppState;

/// GET /orders - Orders belonging to the caller
///
/// Scoped by joining to the user whose email is in the token, never by a
/// client-supplied id.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    QueryParam(query): QueryParam<ListQuery>,
) -> ApiResult<Vec<Order>> {
    let mut sql = String::from(
        "SELECT o.id, o.date, o.id_user AS \"idUser\" \
         FROM orders AS o \
         INNER JOIN users AS u ON o.id_user = u.id \
         WHERE u.email = :email",
    );
    let mut params = params! { "email" => auth_user.email };
    query.paginate(&mut sql, &mut params);

    let rows = state.db.select(&sql, &params).await?;
    Ok(Json(from_rows(rows)?))
}

/// POST /order - Place an order
pub async fn create(
    State(state): State<AppState>,
    JsonBody(order): JsonBody<NewOrder>,
) -> ApiResult<Order> {
    let id = state
        .db
        .insert(
            "INSERT INTO orders (date, id_user) VALUES (:date, :idUser) RETURNING id",
            &params! { "date" => order.date, "idUser" => order.id_user },
        )
        .await?;

    Ok(Json(order.with_id(id)))
}

/// DELETE /order/:id - Remove an order
///
/// There is no ownership check: any authenticated caller may delete any order.
pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<MutationResult> {
    let affected = state
        .db
        .delete("DELETE FROM orders WHERE id = :id", &params! { "id" => id })
        .await?;

    Ok(Json(affected.into()))
}
