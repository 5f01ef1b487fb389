use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// Writable product fields, used by create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl ProductFields {
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}
