use actix_web::{http::StatusCode, test::TestRequest};
use rsvp_engine::{
    db_types::{PushToken, TokenOwner},
    ClientManagement,
    TokenManagement,
};
use serde_json::{json, Value};

use super::helpers::{send_request, test_context, wait_for_notifications, TestContext};

fn new_order() -> Value {
    json!({
        "id": "order-1",
        "userUid": "alice",
        "merchantUid": "warung",
        "orderDate": "2024-05-01T12:00:00Z"
    })
}

async fn create_order(ctx: &TestContext) -> (StatusCode, String) {
    send_request(ctx, TestRequest::post().uri("/orders").set_json(new_order())).await
}

#[actix_web::test]
async fn health_check() {
    let ctx = test_context();
    let (status, body) = send_request(&ctx, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn create_and_fetch_an_order() {
    let ctx = test_context();
    let (status, body) = create_order(&ctx).await;
    assert_eq!(status, StatusCode::CREATED);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["id"], "order-1");
    assert_eq!(order["userUid"], "alice");
    assert_eq!(order["merchantUid"], "warung");
    assert_eq!(order["orderStatus"], json!(["WAITING_MERCHANT_CONFIRMATION"]));

    let (status, body) = send_request(&ctx, TestRequest::get().uri("/orders/order-1")).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched, order);
}

#[actix_web::test]
async fn duplicate_orders_conflict() {
    let ctx = test_context();
    create_order(&ctx).await;
    let (status, body) = create_order(&ctx).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already exists"));
}

#[actix_web::test]
async fn orders_need_an_id() {
    let ctx = test_context();
    let mut order = new_order();
    order["id"] = json!("");
    let (status, _) = send_request(&ctx, TestRequest::post().uri("/orders").set_json(order)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_order() {
    let ctx = test_context();
    let (status, body) = send_request(&ctx, TestRequest::get().uri("/orders/order-404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. orders/order-404"}"#);
}

#[actix_web::test]
async fn status_updates_notify_both_parties() {
    let ctx = test_context();
    ctx.db.add_token(TokenOwner::Client("alice".into()), "alice-phone").await;
    ctx.db.add_token(TokenOwner::Merchant("warung".into()), "warung-till").await;
    create_order(&ctx).await;
    let req = TestRequest::post().uri("/orders/order-1/status").set_json(json!({"status": "WAITING_PAYMENT"}));
    let (status, body) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["orderStatus"], json!(["WAITING_MERCHANT_CONFIRMATION", "WAITING_PAYMENT"]));

    assert!(wait_for_notifications(&ctx.push, 2).await);
    let to_client = ctx.push.sent_to(&PushToken::from("alice-phone"));
    assert_eq!(to_client[0].title, "Reservation accepted, please pay to proceed");
    let to_merchant = ctx.push.sent_to(&PushToken::from("warung-till"));
    assert_eq!(to_merchant[0].title, "Reservation confirmed, waiting for payment");
}

#[actix_web::test]
async fn status_update_for_missing_order() {
    let ctx = test_context();
    let req = TestRequest::post().uri("/orders/order-404/status").set_json(json!({"status": "DONE"}));
    let (status, _) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn clients_and_merchants() {
    let ctx = test_context();
    let req = TestRequest::put().uri("/clients/alice").set_json(json!({"locationCoordinate": "-6.2,106.8"}));
    let (status, body) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"uid":"alice","locationCoordinate":"-6.2,106.8","nearFCMSent":false}"#);

    let req = TestRequest::put().uri("/clients/alice/location").set_json(json!({"locationCoordinate": "-6.3,106.9"}));
    let (status, _) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::OK);
    let client = ctx.db.fetch_client(&"alice".into()).await.unwrap().unwrap();
    assert_eq!(client.location_coordinate, "-6.3,106.9");

    let (status, body) = send_request(&ctx, TestRequest::get().uri("/clients/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"uid":"alice","locationCoordinate":"-6.3,106.9","nearFCMSent":false}"#);

    let req = TestRequest::put().uri("/clients/bob/location").set_json(json!({"locationCoordinate": "0,0"}));
    let (status, _) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = TestRequest::put().uri("/merchants/warung").set_json(json!({"locationCoordinate": "-6.21,106.8"}));
    let (status, body) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"warung","locationCoordinate":"-6.21,106.8"}"#);
}

#[actix_web::test]
async fn push_token_lifecycle() {
    let ctx = test_context();
    let register = || TestRequest::post().uri("/tokens/merchant/warung").set_json(json!({"token": "till-1"}));
    let (status, _) = send_request(&ctx, register()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send_request(&ctx, register()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_request(&ctx, TestRequest::get().uri("/tokens/merchants/warung")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"["till-1"]"#);

    let (status, body) = send_request(&ctx, TestRequest::delete().uri("/tokens/merchant/warung/till-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#));
    let tokens = ctx.db.fetch_tokens(&TokenOwner::Merchant("warung".into())).await.unwrap();
    assert!(tokens.is_empty());

    let (_, body) = send_request(&ctx, TestRequest::delete().uri("/tokens/merchant/warung/till-1")).await;
    assert!(body.contains(r#""success":false"#));
}

#[actix_web::test]
async fn unknown_token_owner_kind() {
    let ctx = test_context();
    let req = TestRequest::post().uri("/tokens/courier/dave").set_json(json!({"token": "x"}));
    let (status, body) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("courier"));
}
