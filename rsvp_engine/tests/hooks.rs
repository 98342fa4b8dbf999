use std::sync::Arc;

use chrono::{Duration, Utc};
use log::*;
use rsvp_engine::{
    config::NotifierConfig,
    db_types::{Client, Merchant, NewOrder, OrderId, OrderStatusType, PushToken, TokenOwner},
    events::{EventHandlers, EventHooks},
    helpers::{NOTIFICATION_BODY, PROXIMITY_MESSAGE},
    test_utils::{MemoryDatabase, RecordingPushDelivery},
    watchers::watcher_hooks,
    ClientManagement,
    DocumentApi,
};
use tokio::task::JoinHandle;

const MERCHANT_LOCATION: &str = "-8.65,115.22";
const NEARBY: &str = "-8.66,115.22";
const FAR_AWAY: &str = "-6.2,106.8";

fn start(
    db: &MemoryDatabase,
    push: &Arc<RecordingPushDelivery>,
) -> (DocumentApi<MemoryDatabase>, Vec<JoinHandle<usize>>) {
    let hooks = watcher_hooks(db.clone(), Arc::clone(push), NotifierConfig::default());
    let handlers = EventHandlers::new(10, hooks);
    let api = DocumentApi::new(db.clone(), handlers.producers());
    let tasks = handlers.start_handlers();
    (api, tasks)
}

/// Drops the API (and with it, every producer) and waits for the handlers to drain.
async fn stop(api: DocumentApi<MemoryDatabase>, tasks: Vec<JoinHandle<usize>>) -> usize {
    drop(api);
    let mut handled = 0;
    for task in tasks {
        handled += task.await.expect("Handler task panicked");
    }
    handled
}

async fn seed(db: &MemoryDatabase) {
    let _ = env_logger::try_init();
    db.upsert_client(Client::new("alice", FAR_AWAY)).await.unwrap();
    db.upsert_merchant(Merchant::new("warung", MERCHANT_LOCATION)).await.unwrap();
    db.add_token(TokenOwner::Client("alice".into()), "alice-phone").await;
    db.add_token(TokenOwner::Client("alice".into()), "alice-tablet").await;
    db.add_token(TokenOwner::Merchant("warung".into()), "warung-till").await;
}

/// A reservation that, once the order time offset is applied, starts in half an hour.
fn imminent_order(id: &str) -> NewOrder {
    let config = NotifierConfig::default();
    let date = Utc::now() + config.order_time_offset + Duration::minutes(30);
    NewOrder::new(id, "alice", "warung", date)
}

#[tokio::test]
async fn status_changes_reach_both_parties() {
    let db = MemoryDatabase::default();
    seed(&db).await;
    let push = Arc::new(RecordingPushDelivery::default());
    let (api, tasks) = start(&db, &push);

    let order = api.create_order(imminent_order("order-1")).await.unwrap();
    api.append_order_status(&order.id, OrderStatusType::WaitingPayment).await.unwrap();
    api.append_order_status(&order.id, OrderStatusType::OnProgress).await.unwrap();
    let handled = stop(api, tasks).await;
    assert_eq!(handled, 2);

    let phone = push.sent_to(&PushToken::from("alice-phone"));
    let mut titles = phone.iter().map(|n| n.title.as_str()).collect::<Vec<_>>();
    titles.sort();
    assert_eq!(titles, vec!["Reservation accepted, please pay to proceed", "Reservation paid!"]);
    assert_eq!(push.sent_to(&PushToken::from("alice-tablet")).len(), 2);
    let till = push.sent_to(&PushToken::from("warung-till"));
    let mut titles = till.iter().map(|n| n.title.as_str()).collect::<Vec<_>>();
    titles.sort();
    assert_eq!(titles, vec!["Reservation confirmed, waiting for payment", "Reservation paid!"]);
    assert!(push.sent().iter().all(|(_, n)| n.body == NOTIFICATION_BODY));
    info!("🚀️ test complete");
}

#[tokio::test]
async fn proximity_alert_is_sent_once_per_trip() {
    let db = MemoryDatabase::default();
    seed(&db).await;
    let push = Arc::new(RecordingPushDelivery::default());
    let mut order = imminent_order("order-2");
    order.initial_status = OrderStatusType::OnProgress;

    // Alice heads for the restaurant
    let (api, tasks) = start(&db, &push);
    api.create_order(order).await.unwrap();
    api.update_client_location(&"alice".into(), NEARBY).await.unwrap();
    stop(api, tasks).await;
    let alerts = push.sent_to(&PushToken::from("warung-till"));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, PROXIMITY_MESSAGE);
    assert!(db.fetch_client(&"alice".into()).await.unwrap().unwrap().near_fcm_sent);

    // Moving again does nothing until the reservation is finished
    let (api, tasks) = start(&db, &push);
    api.update_client_location(&"alice".into(), "-8.655,115.22").await.unwrap();
    stop(api, tasks).await;
    assert_eq!(push.sent_to(&PushToken::from("warung-till")).len(), 1);
    assert_eq!(db.order_queries(), 1);

    // Finishing the reservation clears the flag
    let (api, tasks) = start(&db, &push);
    api.append_order_status(&OrderId::from("order-2"), OrderStatusType::Done).await.unwrap();
    stop(api, tasks).await;
    assert!(!db.fetch_client(&"alice".into()).await.unwrap().unwrap().near_fcm_sent);
    let done = push.sent_to(&PushToken::from("alice-phone"));
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].title, "Reservation Done, Thank You!");
}

#[tokio::test]
async fn upserting_a_client_is_an_update() {
    let db = MemoryDatabase::default();
    seed(&db).await;
    let push = Arc::new(RecordingPushDelivery::default());
    let mut order = imminent_order("order-3");
    order.initial_status = OrderStatusType::OnProgress;

    let (api, tasks) = start(&db, &push);
    api.create_order(order).await.unwrap();
    api.upsert_client(Client::new("alice", NEARBY)).await.unwrap();
    // New clients are not announced
    api.upsert_client(Client::new("bob", NEARBY)).await.unwrap();
    let handled = stop(api, tasks).await;
    assert_eq!(handled, 1);
    assert_eq!(push.sent_to(&PushToken::from("warung-till")).len(), 1);
}

#[tokio::test]
async fn updates_to_missing_documents_fail() {
    let db = MemoryDatabase::default();
    let push = Arc::new(RecordingPushDelivery::default());
    let (api, tasks) = start(&db, &push);
    assert!(api.append_order_status(&OrderId::from("nope"), OrderStatusType::Done).await.is_err());
    assert!(api.update_client_location(&"nobody".into(), NEARBY).await.is_err());
    let handled = stop(api, tasks).await;
    assert_eq!(handled, 0);
}

#[tokio::test]
async fn hooks_can_be_added_alongside_the_watchers() {
    let db = MemoryDatabase::default();
    seed(&db).await;
    let push = Arc::new(RecordingPushDelivery::default());
    let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen_copy = Arc::clone(&seen);
    let mut audit = EventHooks::default();
    audit.on_order_updated(move |ev| {
        info!("🪝️ Order {} updated", ev.order_id);
        seen_copy.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Box::pin(async {})
    });
    let watchers = EventHandlers::new(10, watcher_hooks(db.clone(), Arc::clone(&push), NotifierConfig::default()));
    let auditor = EventHandlers::new(10, audit);
    let mut producers = watchers.producers();
    producers.order_updated_producer.extend(auditor.producers().order_updated_producer);
    let api = DocumentApi::new(db.clone(), producers);
    let mut tasks = watchers.start_handlers();
    tasks.extend(auditor.start_handlers());

    let order = api.create_order(imminent_order("order-4")).await.unwrap();
    api.append_order_status(&order.id, OrderStatusType::Cancelled).await.unwrap();
    stop(api, tasks).await;
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(push.sent().len(), 3);
}
