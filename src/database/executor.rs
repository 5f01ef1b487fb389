use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgArguments, Column, PgPool, Row as _, TypeInfo};

use super::manager::DatabaseError;
use super::params::{NamedQuery, Params};
use crate::config::DatabaseConfig;

/// One result row, keyed by selected column alias.
pub type Row = Map<String, Value>;

/// Runs parameterized statements against the store.
///
/// Statements use `:name` placeholders; values only ever travel as bound
/// parameters.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn select(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DatabaseError>;

    /// Run an `INSERT ... RETURNING id` and yield the generated id.
    async fn insert(&self, sql: &str, params: &Params) -> Result<i64, DatabaseError>;

    /// Rows touched by an UPDATE.
    async fn update(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError>;

    /// Rows removed by a DELETE.
    async fn delete(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// [`QueryExecutor`] backed by a Postgres pool
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
    log_queries: bool,
    slow_query_threshold_ms: u64,
}

impl PgExecutor {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            log_queries: config.enable_query_logging,
            slow_query_threshold_ms: config.slow_query_threshold_ms,
        }
    }

    fn prepare(&self, sql: &str, params: &Params) -> Result<NamedQuery, DatabaseError> {
        let named = NamedQuery::compile(sql, params)?;
        if self.log_queries {
            tracing::debug!(sql = %named.sql, params = named.values.len(), "executing query");
        }
        Ok(named)
    }

    fn observe(&self, sql: &str, started: Instant) {
        let elapsed = started.elapsed().as_millis() as u64;
        if elapsed > self.slow_query_threshold_ms {
            tracing::warn!(sql = %sql, elapsed_ms = elapsed, "slow query");
        }
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn select(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DatabaseError> {
        let named = self.prepare(sql, params)?;
        let started = Instant::now();

        let mut q = sqlx::query(&named.sql);
        for value in &named.values {
            q = bind_param(q, value);
        }
        let rows = q.fetch_all(&self.pool).await?;
        self.observe(&named.sql, started);

        rows.iter().map(row_to_json).collect()
    }

    async fn insert(&self, sql: &str, params: &Params) -> Result<i64, DatabaseError> {
        let named = self.prepare(sql, params)?;
        let started = Instant::now();

        let mut q = sqlx::query(&named.sql);
        for value in &named.values {
            q = bind_param(q, value);
        }
        let row = q.fetch_one(&self.pool).await?;
        self.observe(&named.sql, started);

        match row_to_json(&row)?.get("id") {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| DatabaseError::UnexpectedShape(format!("non-integer id {}", n))),
            other => Err(DatabaseError::UnexpectedShape(format!(
                "INSERT did not return an id column (got {:?})",
                other
            ))),
        }
    }

    async fn update(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError> {
        self.execute(sql, params).await
    }

    async fn delete(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError> {
        self.execute(sql, params).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl PgExecutor {
    async fn execute(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError> {
        let named = self.prepare(sql, params)?;
        let started = Instant::now();

        let mut q = sqlx::query(&named.sql);
        for value in &named.values {
            q = bind_param(q, value);
        }
        let result = q.execute(&self.pool).await?;
        self.observe(&named.sql, started);

        Ok(result.rows_affected())
    }
}

/// Convert database row to JSON
fn row_to_json(row: &sqlx::postgres::PgRow) -> Result<Row, DatabaseError> {
    let mut record = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = extract_column_value(row, i, column.type_info())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

/// Extract typed value from database column
fn extract_column_value(
    row: &sqlx::postgres::PgRow,
    index: usize,
    type_info: &sqlx::postgres::PgTypeInfo,
) -> Result<Value, DatabaseError> {
    let value = match type_info.name() {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::String),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)?
            .map(|n| Value::Number(n.into())),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)?
            .map(|n| Value::Number(n.into())),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)?
            .map(|n| Value::Number(n.into())),
        "FLOAT4" | "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)?
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map(|t| Value::String(t.to_string())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        other => {
            return Err(DatabaseError::UnexpectedShape(format!(
                "unsupported column type {}",
                other
            )))
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Bind parameter to SQL query
fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // Only scalars are ever bound; composite values travel as JSON
        Value::Array(_) | Value::Object(_) => q.bind(v),
    }
}
