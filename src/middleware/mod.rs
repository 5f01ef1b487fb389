pub mod auth;
pub mod extract;
pub mod security_headers;
pub mod validate;

pub use auth::{token_auth_middleware, AuthUser, TOKEN_HEADER};
pub use extract::{JsonBody, PathParam, QueryParam};
pub use security_headers::security_headers_middleware;
pub use validate::{login_gate, signup_gate, ValidationStep, LOGIN_CHAIN, SIGNUP_CHAIN};
