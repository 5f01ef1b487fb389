pub mod executor;
pub mod manager;
pub mod models;
pub mod pagination;
pub mod params;

pub use executor::{PgExecutor, QueryExecutor, Row};
pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::{ListQuery, Pagination};
pub use params::{NamedQuery, Params};
