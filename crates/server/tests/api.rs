use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ActiveValue, Database, EntityTrait};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::users;
use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let user = users::ActiveModel {
        username: ActiveValue::Set("alice".to_string()),
        password: ActiveValue::Set("password".to_string()),
    };
    users::Entity::insert(user).exec(&db).await.unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::app(engine, db)
}

fn basic_auth() -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("alice:password")
    )
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth());
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app().await;
    let credentials = base64::engine::general_purpose::STANDARD.encode("alice:nope");
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/accounts")
                .header(header::AUTHORIZATION, format!("Basic {credentials}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_expense_balance_flow() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/accounts",
            Some(json!({
                "name": "Checking",
                "kind": "checking",
                "initial_balance_minor": 10_000,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let account = json_body(response).await;
    let account_id = account["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/transactions",
            Some(json!({
                "account_id": account_id,
                "kind": "expense",
                "amount_minor": 4_000,
                "occurred_at": "2026-08-01T12:00:00Z",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(authed("GET", "/balance", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let balance = json_body(response).await;
    assert_eq!(balance["total_minor"], json!(6_000));

    // Overdrawing a checking account surfaces as a conflict.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/transactions",
            Some(json!({
                "account_id": account_id,
                "kind": "expense",
                "amount_minor": 99_999,
                "occurred_at": "2026-08-02T12:00:00Z",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(authed("GET", "/stats?period=month", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;
    assert_eq!(stats["net_worth_minor"], json!(6_000));
}

#[tokio::test]
async fn settle_debt_over_http() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/accounts",
            Some(json!({
                "name": "Checking",
                "kind": "checking",
                "initial_balance_minor": 10_000,
            })),
        ))
        .await
        .unwrap();
    let account = json_body(response).await;
    let account_id = account["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/debts",
            Some(json!({"person_name": "Bob", "amount_minor": 5_000})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let debt = json_body(response).await;
    let debt_id = debt["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/debts/{debt_id}/settle"),
            Some(json!({"account_id": account_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let settled = json_body(response).await;
    assert_eq!(settled["debt"]["is_paid"], json!(true));

    // Second settlement attempt conflicts.
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/debts/{debt_id}/settle"),
            Some(json!({"account_id": account_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(authed("GET", "/balance", None))
        .await
        .unwrap();
    let balance = json_body(response).await;
    assert_eq!(balance["total_minor"], json!(15_000));
}

#[tokio::test]
async fn missing_account_is_not_found() {
    let app = app().await;
    let response = app
        .oneshot(authed(
            "GET",
            "/accounts/00000000-0000-0000-0000-000000000000",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
