//! Entity rows and request payloads, serialized with the wire field names.

pub mod order;
pub mod order_line;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order};
pub use order_line::{NewOrderLine, OrderLine};
pub use product::{Product, ProductFields};
pub use user::{Credentials, PasswordChange, User};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::executor::Row;
use super::manager::DatabaseError;

/// Raw result of an UPDATE or DELETE: how many rows it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub affected_rows: u64,
}

impl From<u64> for MutationResult {
    fn from(affected_rows: u64) -> Self {
        Self { affected_rows }
    }
}

/// Map store rows onto a typed entity.
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DatabaseError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row))
                .map_err(|e| DatabaseError::UnexpectedShape(e.to_string()))
        })
        .collect()
}

/// Accept an integer given either as a JSON number or a numeric string.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => Ok(n),
        IntOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {:?}", s))),
    }
}
