mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::TimeDelta;
use common::test_app;
use food_order_service::routes;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn as_user(method: &str, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn order_body() -> Value {
    json!({
        "order_number": "N-1",
        "fio": "Ivanov I.I.",
        "restaurant_id": "rest1",
        "items": [{ "food_id": "f1", "name": "Pizza", "quantity": 2, "price": 500 }],
        "address": { "street": "Main", "house": "1" }
    })
}

#[tokio::test]
async fn health_and_fallback() {
    let app = routes::app(test_app().state, true);

    let (status, body) = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = send(
        &app,
        Request::builder().uri("/nowhere").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["code"], "not_found");
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn create_then_fetch_order_and_status() {
    let test = test_app();
    let app = routes::app(test.state.clone(), true);

    let (status, body) = send(
        &app,
        as_user("POST", "/public/api/v1/order", "u1", Some(order_body())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "created");
    assert_eq!(body["data"]["total_price"], 1000);
    assert_eq!(body["data"]["user_id"], "u1");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    test.clock.advance(TimeDelta::seconds(2));
    let (status, body) = send(
        &app,
        as_user("GET", &format!("/public/api/v1/order/{id}/status"), "u1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_id"], id.as_str());
    assert_eq!(body["data"]["status"], "pending");

    let (status, body) = send(
        &app,
        as_user("GET", &format!("/public/api/v1/order/{id}"), "u1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["address"]["street"], "Main");
}

#[tokio::test]
async fn bypass_header_acts_as_default_user() {
    let app = routes::app(test_app().state, true);
    let request = Request::builder()
        .method("POST")
        .uri("/public/api/v1/order")
        .header("x-bypass-auth", "true")
        .header("content-type", "application/json")
        .body(Body::from(order_body().to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], "default-user");
}

#[tokio::test]
async fn error_responses_carry_codes() {
    let test = test_app();
    let app = routes::app(test.state.clone(), true);

    let anonymous = Request::builder()
        .method("POST")
        .uri("/public/api/v1/order")
        .header("content-type", "application/json")
        .body(Body::from(order_body().to_string()))
        .unwrap();
    let (status, body) = send(&app, anonymous).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["code"], "unauthorized");

    let (status, body) = send(
        &app,
        as_user(
            "POST",
            "/public/api/v1/order",
            "u1",
            Some(json!({ "items": [], "restaurant_id": "rest1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "bad_request");

    let (status, body) = send(
        &app,
        as_user("GET", "/public/api/v1/order/not-a-uuid", "u1", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "bad_request");

    let (status, body) = send(
        &app,
        as_user(
            "GET",
            "/public/api/v1/order/67e55044-10b1-426f-9247-bb680e5fe0c8",
            "u1",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["code"], "not_found");

    let (status, _) = send(
        &app,
        as_user("GET", "/public/api/v1/orders?from=yesterday", "u1", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_list_and_delete_over_http() {
    let test = test_app();
    let app = routes::app(test.state.clone(), true);

    let (_, body) = send(
        &app,
        as_user("POST", "/public/api/v1/order", "u1", Some(order_body())),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/public/api/v1/order/{id}");

    let (status, body) = send(&app, as_user("DELETE", &uri, "u2", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["code"], "forbidden");

    let (status, body) = send(
        &app,
        as_user("PUT", &uri, "u1", Some(json!({ "fio": "Petrov P.P." }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "updated");
    assert_eq!(body["data"]["fio"], "Petrov P.P.");

    let (status, body) = send(
        &app,
        as_user(
            "GET",
            "/public/api/v1/orders?from=2025-08-31T12:00:00Z",
            "u1",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = send(&app, as_user("DELETE", &uri, "u1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "deleted");

    let (status, _) = send(&app, as_user("GET", &uri, "u1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, as_user("GET", "/public/api/v1/orders", "u1", None)).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn debug_seed_route_can_be_disabled() {
    let test = test_app();

    let enabled = routes::app(test.state.clone(), true);
    let (status, body) = send(
        &enabled,
        as_user("POST", "/public/api/v1/debug/seed?n=3", "demo", None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let disabled = routes::app(test.state, false);
    let (status, _) = send(
        &disabled,
        as_user("POST", "/public/api/v1/debug/seed", "demo", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
