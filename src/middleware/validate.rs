//! Request validation gate for the credential routes.
//!
//! Each route declares its own ordered chain of [`ValidationStep`]s. The gate
//! reads the JSON body once, runs the steps in order and answers with the
//! first failure; on success the untouched body is handed to the handler.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::database::{Params, QueryExecutor};
use crate::error::ApiError;
use crate::state::AppState;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern")
});

static PASSWORD_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9!@#?\]]{10,30}$").expect("password pattern"));

const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '?', ']'];

const EMAIL_EXISTS_SQL: &str =
    "SELECT COUNT(*) AS count FROM users WHERE email = :email AND password = :password";

/// Whether a user row with the submitted email and password should exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Signup: the account must not exist yet
    Absent,
    /// Login: the account must exist
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStep {
    EmailShape,
    PasswordShape,
    EmailExistence(Expectation),
}

/// `POST /user`
pub const SIGNUP_CHAIN: &[ValidationStep] = &[
    ValidationStep::EmailShape,
    ValidationStep::PasswordShape,
    ValidationStep::EmailExistence(Expectation::Absent),
];

/// `POST /login`
pub const LOGIN_CHAIN: &[ValidationStep] = &[
    ValidationStep::EmailShape,
    ValidationStep::EmailExistence(Expectation::Present),
    ValidationStep::PasswordShape,
];

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 10-30 characters from `[a-zA-Z0-9!@#?\]]` with at least one digit, one
/// lowercase, one uppercase and one symbol.
pub fn is_valid_password(password: &str) -> bool {
    PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c))
}

fn string_field<'a>(body: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

impl ValidationStep {
    /// Run this step against the parsed body (`None` when the body is missing).
    pub async fn check(
        &self,
        body: Option<&Map<String, Value>>,
        db: &dyn QueryExecutor,
    ) -> Result<(), ApiError> {
        match self {
            ValidationStep::EmailShape => match body.and_then(|b| string_field(b, "email")) {
                Some(email) if is_valid_email(email) => Ok(()),
                _ => Err(ApiError::InvalidEmail),
            },
            ValidationStep::PasswordShape => match body.and_then(|b| string_field(b, "password")) {
                Some(password) if is_valid_password(password) => Ok(()),
                _ => Err(ApiError::InvalidPassword),
            },
            ValidationStep::EmailExistence(expectation) => {
                let body = body.ok_or_else(ApiError::missing_body)?;
                let exists = credentials_exist(body, db).await?;
                match (expectation, exists) {
                    (Expectation::Absent, false) | (Expectation::Present, true) => Ok(()),
                    (Expectation::Absent, true) => Err(ApiError::EmailAlreadyExists),
                    (Expectation::Present, false) => Err(ApiError::EmailNotFound),
                }
            }
        }
    }
}

async fn credentials_exist(
    body: &Map<String, Value>,
    db: &dyn QueryExecutor,
) -> Result<bool, ApiError> {
    let mut params = Params::new();
    for name in ["email", "password"] {
        let value = match body.get(name) {
            Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => v.clone(),
            _ => Value::Null,
        };
        params.insert(name.to_string(), value);
    }

    let rows = db.select(EMAIL_EXISTS_SQL, &params).await?;
    let count = rows
        .first()
        .and_then(|row| row.get("count"))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    Ok(count > 0)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Run `chain` in order, stopping at the first failing step.
pub async fn run_chain(
    chain: &[ValidationStep],
    body: Option<&Map<String, Value>>,
    db: &dyn QueryExecutor,
) -> Result<(), ApiError> {
    for step in chain {
        if let Err(err) = step.check(body, db).await {
            tracing::debug!(?step, code = err.error_code(), "validation failed");
            return Err(err);
        }
    }
    Ok(())
}

/// Gate for `POST /user`
pub async fn signup_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(SIGNUP_CHAIN, state, request, next).await
}

/// Gate for `POST /login`
pub async fn login_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(LOGIN_CHAIN, state, request, next).await
}

async fn gate(
    chain: &[ValidationStep],
    state: AppState,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {}", e)))?;

    // Same rule the handler's JSON extractor applies: no JSON content type, no body.
    let parsed = if has_json_content_type(&parts.headers) {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    } else {
        None
    };

    run_chain(chain, parsed.as_ref(), state.db.as_ref()).await?;

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}
