use axum::{
    extract::State,
    Json,
};

use super::ApiResult;
use crate::database::models::{from_rows, MutationResult, Product, ProductFields};
use crate::database::{ListQuery, Params};
use crate::middleware::{JsonBody, PathParam, QueryParam};
use crate::params;
use crate::state::AppState;

/// GET /products - List products (public)
pub async fn list(
    State(state): State<AppState>,
    QueryParam(query): QueryParam<ListQuery>,
) -> ApiResult<Vec<Product>> {
    let mut sql = String::from("SELECT id, name, description, price FROM products");
    let mut params = Params::new();
    query.paginate(&mut sql, &mut params);

    let rows = state.db.select(&sql, &params).await?;
    Ok(Json(from_rows(rows)?))
}

/// POST /product - Create a product
pub async fn create(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<ProductFields>,
) -> ApiResult<Product> {
    let id = state
        .db
        .insert(
            "INSERT INTO products (name, description, price) \
             VALUES (:name, :description, :price) RETURNING id",
            &params! {
                "name" => fields.name,
                "description" => fields.description,
                "price" => fields.price,
            },
        )
        .await?;

    Ok(Json(fields.with_id(id)))
}

/// PUT /product/:id - Overwrite a product's fields
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(fields): JsonBody<ProductFields>,
) -> ApiResult<MutationResult> {
    let affected = state
        .db
        .update(
            "UPDATE products SET name = :name, description = :description, price = :price \
             WHERE id = :id",
            &params! {
                "name" => fields.name,
                "description" => fields.description,
                "price" => fields.price,
                "id" => id,
            },
        )
        .await?;

    Ok(Json(affected.into()))
}

/// DELETE /product/:id - Remove a product
pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<MutationResult> {
    let affected = state
        .db
        .delete("DELETE FROM products WHERE id = :id", &params! { "id" => id })
        .await?;

    Ok(Json(affected.into()))
}
