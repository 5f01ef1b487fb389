use serde::{Deserialize, Serialize};

/// An order placed by a user. `date` is kept exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub date: String,
    #[serde(rename = "idUser")]
    pub id_user: i64,
}

/// Body of `POST /order`. `idUser` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub date: String,
    #[serde(rename = "idUser", deserialize_with = "super::lenient_i64")]
    pub id_user: i64,
}

impl NewOrder {
    pub fn with_id(self, id: i64) -> Order {
        Order {
            id,
            date: self.date,
            id_user: self.id_user,
        }
    }
}
