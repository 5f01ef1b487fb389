mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::*;
use serde_json::json;

#[tokio::test]
async fn signup_with_existing_account_is_400_006() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();
    db.count(1);

    let (status, body) = send(
        router(db.clone()),
        json_request(
            "POST",
            "/user",
            json!({ "email": "diner@example.com", "password": "Abcdefg1!@" }),
        ),
    )
    .await?;

    assert_error(status, &body, 400, "006");
    assert!(db.calls().iter().all(|c| c.kind != Kind::Insert));
    Ok(())
}

#[tokio::test]
async fn signup_returns_the_new_user_with_lowercased_email() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();
    db.count(0).reply(Kind::Insert, Reply::Id(42));

    let (status, body) = send(
        router(db.clone()),
        json_request(
            "POST",
            "/user",
            json!({ "email": "Diner@Example.COM", "password": "Abcdefg1!@" }),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 42, "email": "diner@example.com", "password": "Abcdefg1!@" })
    );

    let insert = db
        .calls()
        .into_iter()
        .find(|c| c.kind == Kind::Insert)
        .expect("insert issued");
    assert!(insert.sql.starts_with("INSERT INTO users"));
    assert_eq!(insert.params["email"], "diner@example.com");
    Ok(())
}

#[tokio::test]
async fn signup_without_body_fails_on_email_first() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();

    let (status, body) = send(router(db.clone()), empty_request("POST", "/user")).await?;

    assert_error(status, &body, 400, "003");
    assert!(db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn signup_with_invalid_email_is_400_003() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();

    let (status, body) = send(
        router(db),
        json_request("POST", "/user", json!({ "email": "testtest.com" })),
    )
    .await?;

    assert_error(status, &body, 400, "003");
    assert_eq!(body["error"], "Invalid Email");
    Ok(())
}

#[tokio::test]
async fn signup_checks_password_shape_before_existence() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();

    let (status, body) = send(
        router(db.clone()),
        json_request("POST", "/user", json!({ "email": "diner@example.com", "password": "test" })),
    )
    .await?;

    assert_error(status, &body, 400, "004");
    assert!(db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn list_users_requires_token_and_paginates() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();
    db.reply(
        Kind::Select,
        Reply::Rows(vec![
            json!({ "id": 1, "email": "a@example.com", "password": "Abcdefg1!@" }),
            json!({ "id": 2, "email": "b@example.com", "password": "Abcdefg2!@" }),
        ]),
    );

    let (status, body) = send(
        router(db.clone()),
        authed_request("GET", "/users?limit=2&offset=5", "a@example.com"),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[1]["email"], "b@example.com");

    let calls = db.calls();
    assert_eq!(
        calls[0].sql,
        "SELECT id, email, password FROM users LIMIT :limit OFFSET :offset"
    );
    assert_eq!(calls[0].params["limit"], 2);
    assert_eq!(calls[0].params["offset"], 5);
    Ok(())
}

#[tokio::test]
async fn change_password_reports_affected_rows() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();
    db.reply(Kind::Update, Reply::Affected(1));

    let (status, body) = send(
        router(db.clone()),
        authed_json_request(
            "PATCH",
            "/changepassword/7",
            "a@example.com",
            json!({ "password": "Newpass12!x" }),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "affectedRows": 1 }));

    let calls = db.calls();
    assert_eq!(calls[0].params["id"], 7);
    assert_eq!(calls[0].params["password"], "Newpass12!x");
    Ok(())
}

#[tokio::test]
async fn store_failure_is_normalized_to_bd() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();
    db.reply(Kind::Select, Reply::Fail);

    let (status, body) = send(
        router(db),
        authed_request("GET", "/users", "a@example.com"),
    )
    .await?;

    assert_error(status, &body, 500, "BD");
    Ok(())
}

#[tokio::test]
async fn signup_body_without_json_content_type_counts_as_missing() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();

    let request = Request::builder()
        .method("POST")
        .uri("/user")
        .body(Body::from(
            json!({ "email": "a@b.co", "password": "Abcdefg1!@" }).to_string(),
        ))?;
    let (status, body) = send(router(db.clone()), request).await?;

    assert_error(status, &body, 400, "003");
    assert!(db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn change_password_requires_a_token() -> anyhow::Result<()> {
    let db = ScriptedExecutor::new();

    let (status, body) = send(
        router(db.clone()),
        json_request("PATCH", "/changepassword/7", json!({ "password": "Newpass12!x" })),
    )
    .await?;

    assert_error(status, &body, 401, "001");
    assert!(db.calls().is_empty());
    Ok(())
}
