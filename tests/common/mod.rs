#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use restaurant_api::{
    app,
    auth::TokenService,
    config::{AppConfig, Environment},
    database::{DatabaseError, NamedQuery, Params, QueryExecutor, Row},
    AppState,
};

pub const SECRET: &str = "integration-test-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Select,
    Insert,
    Update,
    Delete,
}

/// A statement the router sent to the store
#[derive(Debug, Clone)]
pub struct Call {
    pub kind: Kind,
    pub sql: String,
    pub params: Params,
}

#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<Value>),
    Id(i64),
    Affected(u64),
    Fail,
}

/// In-memory stand-in for the store.
///
/// Replies are queued per statement kind and handed out in order. Every call
/// is compiled like the real executor would, so an unbound placeholder fails
/// the test the same way it would fail in production.
#[derive(Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<Vec<(Kind, VecDeque<Reply>)>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, kind: Kind, reply: Reply) -> &Self {
        let mut replies = self.replies.lock().unwrap();
        match replies.iter().position(|(k, _)| *k == kind) {
            Some(index) => replies[index].1.push_back(reply),
            None => replies.push((kind, VecDeque::from([reply]))),
        }
        drop(replies);
        self
    }

    /// Queue the `COUNT(*)` row the credential checks read.
    pub fn count(&self, n: i64) -> &Self {
        self.reply(Kind::Select, Reply::Rows(vec![json!({ "count": n })]))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn take(&self, kind: Kind, sql: &str, params: &Params) -> Result<Reply, DatabaseError> {
        NamedQuery::compile(sql, params)?;

        self.calls.lock().unwrap().push(Call {
            kind,
            sql: sql.to_string(),
            params: params.clone(),
        });

        let mut replies = self.replies.lock().unwrap();
        let reply = replies
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .and_then(|(_, queue)| queue.pop_front());

        match reply {
            Some(Reply::Fail) => Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)),
            Some(reply) => Ok(reply),
            None => Ok(match kind {
                Kind::Select => Reply::Rows(vec![]),
                Kind::Insert => Reply::Id(1),
                Kind::Update | Kind::Delete => Reply::Affected(0),
            }),
        }
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn select(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DatabaseError> {
        match self.take(Kind::Select, sql, params)? {
            Reply::Rows(rows) => Ok(rows
                .into_iter()
                .filter_map(|row| row.as_object().cloned())
                .collect()),
            other => panic!("select answered with {:?}", other),
        }
    }

    async fn insert(&self, sql: &str, params: &Params) -> Result<i64, DatabaseError> {
        match self.take(Kind::Insert, sql, params)? {
            Reply::Id(id) => Ok(id),
            other => panic!("insert answered with {:?}", other),
        }
    }

    async fn update(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError> {
        match self.take(Kind::Update, sql, params)? {
            Reply::Affected(n) => Ok(n),
            other => panic!("update answered with {:?}", other),
        }
    }

    async fn delete(&self, sql: &str, params: &Params) -> Result<u64, DatabaseError> {
        match self.take(Kind::Delete, sql, params)? {
            Reply::Affected(n) => Ok(n),
            other => panic!("delete answered with {:?}", other),
        }
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub fn tokens() -> TokenService {
    TokenService::new(SECRET, Duration::minutes(20))
}

pub fn router(db: Arc<ScriptedExecutor>) -> Router {
    let mut config = AppConfig::defaults(Environment::Development);
    config.database.url = "postgres://localhost/restaurant_test".to_string();
    config.security.token_secret = SECRET.to_string();

    let state = AppState::new(db, tokens(), config.server.max_request_size_bytes);
    app(state, &config)
}

/// `token` header value for `email`
pub fn token_header(email: &str) -> String {
    format!("Bearer {}", tokens().issue(email).unwrap())
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(method: &str, uri: &str, email: &str, body: Value) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request
        .headers_mut()
        .insert("token", token_header(email).parse().unwrap());
    request
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, email: &str) -> Request<Body> {
    let mut request = empty_request(method, uri);
    request
        .headers_mut()
        .insert("token", token_header(email).parse().unwrap());
    request
}

/// Drive one request through the router and decode the JSON reply
/// (`Value::Null` when the body is not JSON).
pub async fn send(router: Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, body))
}

pub fn assert_error(status: StatusCode, body: &Value, expected_status: u16, code: &str) {
    assert_eq!(status.as_u16(), expected_status, "body: {}", body);
    assert_eq!(body["codeError"], code, "body: {}", body);
    assert!(body["error"].is_string(), "body: {}", body);
}
