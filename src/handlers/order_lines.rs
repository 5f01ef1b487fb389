use axum::{
    extract::State,
    Json,
};

use super::ApiResult;
use crate::database::models::{from_rows, MutationResult, NewOrderLine, OrderLine};
use crate::database::ListQuery;
use crate::middleware::{JsonBody, PathParam, QueryParam};
use crate::params;
use crate::state::AppState;

/// GET /detailOrders/:idOrder - Lines of one order
pub async fn list(
    State(state): State<AppState>,
    PathParam(id_order): PathParam<i64>,
    QueryParam(query): QueryParam<ListQuery>,
) -> ApiResult<Vec<OrderLine>> {
    let mut sql = String::from(
        "SELECT id, id_order AS \"idOrder\", id_product AS \"idProduct\" \
         FROM detail_orders WHERE id_order = :idOrder",
    );
    let mut params = params! { "idOrder" => id_order };
    query.paginate(&mut sql, &mut params);

    let rows = state.db.select(&sql, &params).await?;
    Ok(Json(from_rows(rows)?))
}

/// POST /detailOrder - Add a product to an order
pub async fn create(
    State(state): State<AppState>,
    JsonBody(line): JsonBody<NewOrderLine>,
) -> ApiResult<OrderLine> {
    let id = state
        .db
        .insert(
            "INSERT INTO detail_orders (id_order, id_product) \
             VALUES (:idOrder, :idProduct) RETURNING id",
            &params! { "idOrder" => line.id_order, "idProduct" => line.id_product },
        )
        .await?;

    Ok(Json(line.with_id(id)))
}

/// DELETE /detailOrder/:id - Remove one line
pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<MutationResult> {
    let affected = state
        .db
        .delete("DELETE FROM detail_orders WHERE id = :id", &params! { "id" => id })
        .await?;

    Ok(Json(affected.into()))
}
