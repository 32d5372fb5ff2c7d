use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, GatewayOrder, PaymentGateway, ResultEngine};
use migration::MigratorTrait;
use server::Credentials;

#[derive(Debug)]
struct StubGateway;

#[async_trait::async_trait]
impl PaymentGateway for StubGateway {
    fn key_id(&self) -> &str {
        "key_test_stub"
    }

    async fn create_order(&self, amount_minor: i64, currency: &str) -> ResultEngine<GatewayOrder> {
        Ok(GatewayOrder {
            id: format!("order_{}", uuid::Uuid::new_v4().simple()),
            amount_minor,
            currency: currency.to_string(),
        })
    }
}

async fn app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .gateway(Arc::new(StubGateway))
        .build()
        .await
        .unwrap();
    server::router(engine, Credentials::new("test-secret", 60))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn signup_and_login(app: &Router, name: &str, email: &str) -> String {
    let (status, _) = send(
        app,
        request(
            "POST",
            "/user/add-user",
            None,
            Some(json!({ "name": name, "email": email, "password": "hunter2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        request(
            "POST",
            "/user/login",
            None,
            Some(json!({ "email": email, "password": "hunter2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn signup_returns_created_user() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/user/add-user",
            None,
            Some(json!({ "name": "Alice", "email": "Alice@Example.com", "password": "hunter2" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["newUserDetail"]["name"], "Alice");
    // Emails are stored lowercased.
    assert_eq!(body["newUserDetail"]["email"], "alice@example.com");
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = app().await;
    signup_and_login(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/user/add-user",
            None,
            Some(json!({ "name": "Other", "email": "alice@example.com", "password": "x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = app().await;
    signup_and_login(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/user/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_unknown_email_is_not_found() {
    let app = app().await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/user/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;

    let (status, _) = send(&app, request("GET", "/expense/get-expenses", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("GET", "/expense/get-expenses", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expense_crud_round_trip() {
    let app = app().await;
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/expense/add-expense",
            Some(&token),
            Some(json!({ "amount": 1250, "description": "groceries", "category": "food" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["newExpenseDetail"]["amount"], 1250);
    let expense_id = body["newExpenseDetail"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request("GET", "/expense/get-expenses", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allExpenses"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/expense/edit-expense/{expense_id}"),
            Some(&token),
            Some(json!({ "amount": 2000, "description": "groceries", "category": "food" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedExpense"]["amount"], 2000);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/expense/delete-expense/{expense_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        request("GET", "/expense/get-expenses", Some(&token), None),
    )
    .await;
    assert!(body["allExpenses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn add_expense_rejects_non_positive_amount() {
    let app = app().await;
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/expense/add-expense",
            Some(&token),
            Some(json!({ "amount": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn editing_a_foreign_expense_is_not_found() {
    let app = app().await;
    let alice = signup_and_login(&app, "Alice", "alice@example.com").await;
    let bob = signup_and_login(&app, "Bob", "bob@example.com").await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/expense/add-expense",
            Some(&alice),
            Some(json!({ "amount": 500 })),
        ),
    )
    .await;
    let expense_id = body["newExpenseDetail"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/expense/edit-expense/{expense_id}"),
            Some(&bob),
            Some(json!({ "amount": 1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn premium_purchase_grants_leaderboard_access() {
    let app = app().await;
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    // Free users are locked out.
    let (status, _) = send(
        &app,
        request("GET", "/premium/show-leaderboard", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("POST", "/purchase/premiummembership", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["key_id"], "key_test_stub");
    assert_eq!(body["order"]["status"], "PENDING");
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/purchase/updatetransactionstatus",
            Some(&token),
            Some(json!({ "order_id": order_id, "payment_id": "pay_123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["success"], true);
    let premium_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/premium/show-leaderboard",
            Some(&premium_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Replaying the callback must not resettle the order.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/purchase/updatetransactionstatus",
            Some(&token),
            Some(json!({ "order_id": order_id, "payment_id": null })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_transaction_issues_no_token() {
    let app = app().await;
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    let (_, body) = send(
        &app,
        request("POST", "/purchase/premiummembership", Some(&token), None),
    )
    .await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/purchase/updatetransactionstatus",
            Some(&token),
            Some(json!({ "order_id": order_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn callback_for_foreign_order_is_not_found() {
    let app = app().await;
    let alice = signup_and_login(&app, "Alice", "alice@example.com").await;
    let bob = signup_and_login(&app, "Bob", "bob@example.com").await;

    let (_, body) = send(
        &app,
        request("POST", "/purchase/premiummembership", Some(&alice), None),
    )
    .await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/purchase/updatetransactionstatus",
            Some(&bob),
            Some(json!({ "order_id": order_id, "payment_id": "pay_theft" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leaderboard_orders_by_total_descending() {
    let app = app().await;
    let alice = signup_and_login(&app, "Alice", "alice@example.com").await;
    let bob = signup_and_login(&app, "Bob", "bob@example.com").await;

    send(
        &app,
        request(
            "POST",
            "/expense/add-expense",
            Some(&alice),
            Some(json!({ "amount": 100 })),
        ),
    )
    .await;
    send(
        &app,
        request(
            "POST",
            "/expense/add-expense",
            Some(&bob),
            Some(json!({ "amount": 900 })),
        ),
    )
    .await;

    // Promote Alice so she can read the board.
    let (_, body) = send(
        &app,
        request("POST", "/purchase/premiummembership", Some(&alice), None),
    )
    .await;
    let order_id = body["order"]["id"].as_str().unwrap().to_string();
    let (_, body) = send(
        &app,
        request(
            "POST",
            "/purchase/updatetransactionstatus",
            Some(&alice),
            Some(json!({ "order_id": order_id, "payment_id": "pay_1" })),
        ),
    )
    .await;
    let premium_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/premium/show-leaderboard",
            Some(&premium_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries[0]["name"], "Bob");
    assert_eq!(entries[0]["totalExpenses"], 900);
    assert_eq!(entries[1]["name"], "Alice");
    assert_eq!(entries[1]["totalExpenses"], 100);
}
