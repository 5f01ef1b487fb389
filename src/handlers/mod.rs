//! Route handlers, one module per resource.
//!
//! Every handler has the same shape: take the already-authenticated and
//! validated request, build a parameterized statement, run it through the
//! [`QueryExecutor`](crate::database::QueryExecutor) and shape the JSON reply.

pub mod auth;
pub mod order_lines;
pub mod orders;
pub mod products;
pub mod root;
pub mod users;

use axum::Json;

use crate::error::ApiError;

/// Handler result: a JSON body or a uniform error body
pub type ApiResult<T> = Result<Json<T>, ApiError>;
