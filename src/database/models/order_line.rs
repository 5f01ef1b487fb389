use serde::{Deserialize, Serialize};

/// One product on an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    #[serde(rename = "idOrder")]
    pub id_order: i64,
    #[serde(rename = "idProduct")]
    pub id_product: i64,
}

/// Body of `POST /detailOrder`
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderLine {
    #[serde(rename = "idOrder")]
    pub id_order: i64,
    #[serde(rename = "idProduct")]
    pub id_product: i64,
}

impl NewOrderLine {
    pub fn with_id(self, id: i64) -> OrderLine {
        OrderLine {
            id,
            id_order: self.id_order,
            id_product: self.id_product,
        }
    }
}
