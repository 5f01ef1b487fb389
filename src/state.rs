use std::sync::Arc;

use crate::auth::TokenService;
use crate::database::QueryExecutor;

/// Shared by every handler. The executor's pool is the only shared resource;
/// nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn QueryExecutor>,
    pub tokens: Arc<TokenService>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(db: Arc<dyn QueryExecutor>, tokens: TokenService, max_body_bytes: usize) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            max_body_bytes,
        }
    }
}
