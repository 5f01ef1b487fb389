// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::auth::TokenError;
use crate::database::DatabaseError;

/// HTTP API error. Every variant renders as `{"error": ..., "codeError": ...}`.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    MissingToken,
    InvalidToken,

    // 400 Bad Request
    InvalidEmail,
    InvalidPassword,
    BadRequest(String),
    EmailAlreadyExists,
    EmailNotFound,

    // 500 Internal Server Error
    InvalidCredentials,
    Database(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidEmail
            | ApiError::InvalidPassword
            | ApiError::BadRequest(_)
            | ApiError::EmailAlreadyExists
            | ApiError::EmailNotFound => StatusCode::BAD_REQUEST,
            // Login mismatch has always answered 500; clients depend on it.
            ApiError::InvalidCredentials => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::MissingToken => "Invalid Token",
            ApiError::InvalidToken => {
                "The user you are trying to log in does not have sufficient privileges."
            }
            ApiError::InvalidEmail => "Invalid Email",
            ApiError::InvalidPassword => "Invalid Password",
            ApiError::BadRequest(msg) => msg,
            ApiError::EmailAlreadyExists => "Email already exist",
            ApiError::EmailNotFound => "Email not exist",
            ApiError::InvalidCredentials => "User or password incorrect",
            ApiError::Database(msg) => msg,
        }
    }

    /// Three-digit code clients switch on (`BD` for store failures)
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "001",
            ApiError::InvalidToken => "002",
            ApiError::InvalidEmail => "003",
            ApiError::InvalidPassword => "004",
            ApiError::BadRequest(_) => "005",
            ApiError::EmailAlreadyExists => "006",
            ApiError::EmailNotFound => "007",
            ApiError::InvalidCredentials => "007",
            ApiError::Database(_) => "BD",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.message(),
            "codeError": self.error_code()
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// The generic "missing body" rejection.
    pub fn missing_body() -> Self {
        ApiError::BadRequest("Badrequest".to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // Log the real error but return generic message
        tracing::error!("Database error: {}", err);
        match err {
            DatabaseError::MissingParameter(_) | DatabaseError::UnexpectedShape(_) => {
                ApiError::Database("An error occurred while processing your request".to_string())
            }
            DatabaseError::Sqlx(_) | DatabaseError::InvalidDatabaseUrl => {
                ApiError::Database("Database error occurred".to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => ApiError::MissingToken,
            TokenError::InvalidToken(reason) => {
                tracing::debug!("Token rejected: {}", reason);
                ApiError::InvalidToken
            }
            TokenError::Generation(reason) => {
                tracing::error!("Token generation failed: {}", reason);
                ApiError::Database("Failed to issue token".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("JSON body rejected: {}", rejection.body_text());
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::missing_body(),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.error_code())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_follow_the_taxonomy() {
        let cases = [
            (ApiError::MissingToken, 401, "001"),
            (ApiError::InvalidToken, 401, "002"),
            (ApiError::InvalidEmail, 400, "003"),
            (ApiError::InvalidPassword, 400, "004"),
            (ApiError::missing_body(), 400, "005"),
            (ApiError::EmailAlreadyExists, 400, "006"),
            (ApiError::EmailNotFound, 400, "007"),
            (ApiError::InvalidCredentials, 500, "007"),
            (ApiError::Database("boom".into()), 500, "BD"),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{}", err);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn body_shape_is_error_and_code() {
        let body = ApiError::InvalidEmail.to_json();
        assert_eq!(body, json!({ "error": "Invalid Email", "codeError": "003" }));
    }

    #[test]
    fn store_errors_are_normalized() {
        let err: ApiError = DatabaseError::MissingParameter("email".into()).into();
        assert_eq!(err.error_code(), "BD");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("email"));
    }
}
