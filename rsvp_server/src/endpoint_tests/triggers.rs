use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{Duration, Utc};
use rsvp_engine::{
    config::NotifierConfig,
    db_types::{Client, Merchant, NewOrder, OrderStatusType, PushToken, TokenOwner},
    helpers::{NOTIFICATION_BODY, PROXIMITY_MESSAGE},
    ClientManagement,
    OrderManagement,
};
use serde_json::json;

use super::helpers::{send_request, test_context, wait_for_notifications};

fn order_json(statuses: &[&str]) -> serde_json::Value {
    json!({
        "id": "order-7",
        "userUid": "alice",
        "merchantUid": "warung",
        "orderStatus": statuses,
        "orderDate": "2024-05-01T12:00:00Z"
    })
}

#[actix_web::test]
async fn order_trigger_runs_the_status_watcher() {
    let ctx = test_context();
    ctx.db.add_token(TokenOwner::Client("alice".into()), "alice-phone").await;
    ctx.db.add_token(TokenOwner::Merchant("warung".into()), "warung-till").await;
    let body = json!({
        "before": order_json(&["WAITING_MERCHANT_CONFIRMATION"]),
        "after": order_json(&["WAITING_MERCHANT_CONFIRMATION", "WAITING_PAYMENT"]),
    });
    let req = TestRequest::post().uri("/triggers/orders/order-7").set_json(body);
    let (status, body) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, r#"{"success":true,"message":"Update to order order-7 queued"}"#);

    assert!(wait_for_notifications(&ctx.push, 2).await);
    let to_client = ctx.push.sent_to(&PushToken::from("alice-phone"));
    assert_eq!(to_client.len(), 1);
    assert_eq!(to_client[0].title, "Reservation accepted, please pay to proceed");
    assert_eq!(to_client[0].body, NOTIFICATION_BODY);
    let to_merchant = ctx.push.sent_to(&PushToken::from("warung-till"));
    assert_eq!(to_merchant[0].title, "Reservation confirmed, waiting for payment");
}

#[actix_web::test]
async fn client_trigger_runs_the_location_watcher() {
    let ctx = test_context();
    ctx.db.upsert_client(Client::new("alice", "-6.9,107.6")).await.unwrap();
    ctx.db.upsert_merchant(Merchant::new("warung", "-6.2,106.8")).await.unwrap();
    ctx.db.add_token(TokenOwner::Merchant("warung".into()), "warung-till").await;
    let date = Utc::now() + NotifierConfig::default().order_time_offset + Duration::minutes(15);
    let mut order = NewOrder::new("order-8", "alice", "warung", date);
    order.initial_status = OrderStatusType::OnProgress;
    ctx.db.insert_order(order).await.unwrap();

    let body = json!({
        "before": {"uid": "alice", "locationCoordinate": "-6.9,107.6", "nearFCMSent": false},
        "after": {"uid": "alice", "locationCoordinate": "-6.21,106.8", "nearFCMSent": false},
    });
    let req = TestRequest::post().uri("/triggers/clients/alice").set_json(body);
    let (status, _) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    assert!(wait_for_notifications(&ctx.push, 1).await);
    let alerts = ctx.push.sent_to(&PushToken::from("warung-till"));
    assert_eq!(alerts[0].title, PROXIMITY_MESSAGE);
    // The flag is written after the sends complete
    let mut flagged = false;
    for _ in 0..200 {
        if ctx.db.fetch_client(&"alice".into()).await.unwrap().is_some_and(|c| c.near_fcm_sent) {
            flagged = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(flagged);
}

#[actix_web::test]
async fn malformed_trigger_bodies_are_rejected() {
    let ctx = test_context();
    let req = TestRequest::post().uri("/triggers/orders/order-7").set_json(json!({"after": order_json(&[])}));
    let (status, _) = send_request(&ctx, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(ctx.push.sent().is_empty());
}
