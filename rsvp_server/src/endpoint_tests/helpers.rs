use std::time::Duration;

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use log::debug;
use rsvp_engine::{
    config::NotifierConfig,
    test_utils::{MemoryDatabase, RecordingPushDelivery},
    DocumentApi,
};

use crate::{integrations::fcm::create_notification_event_handlers, routes::configure_routes};

pub struct TestContext {
    pub db: MemoryDatabase,
    pub push: RecordingPushDelivery,
    pub api: DocumentApi<MemoryDatabase>,
}

/// An in-memory store with both watchers running against it. Notifications are recorded rather than sent.
pub fn test_context() -> TestContext {
    let _ = env_logger::try_init().ok();
    let db = MemoryDatabase::default();
    let push = RecordingPushDelivery::default();
    let handlers = create_notification_event_handlers(db.clone(), push.clone(), NotifierConfig::default(), 10);
    let api = DocumentApi::new(db.clone(), handlers.producers());
    // The handlers stop by themselves once the last API clone is dropped
    let _tasks = handlers.start_handlers();
    TestContext { db, push, api }
}

pub async fn send_request(ctx: &TestContext, req: TestRequest) -> (StatusCode, String) {
    let app = App::new().app_data(web::Data::new(ctx.api.clone())).configure(configure_routes::<MemoryDatabase>);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// Notifications are sent from background tasks, so poll until `count` of them have been recorded.
pub async fn wait_for_notifications(push: &RecordingPushDelivery, count: usize) -> bool {
    for _ in 0..200 {
        if push.sent().len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
