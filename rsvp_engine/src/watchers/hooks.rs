use std::sync::Arc;

use log::*;

use crate::{
    config::NotifierConfig,
    db::traits::NotificationDatabase,
    events::EventHooks,
    notifier::PushDelivery,
    watchers::{ClientLocationWatcher, LocationOutcome, OrderStatusOutcome, OrderStatusWatcher},
};

/// Hooks that run the [`OrderStatusWatcher`] on every order update and the [`ClientLocationWatcher`] on every client
/// update.
///
/// Errors are logged here. A failed invocation has no effect on later events.
pub fn watcher_hooks<B, P>(db: B, push: Arc<P>, config: NotifierConfig) -> EventHooks
where
    B: NotificationDatabase,
    P: PushDelivery,
{
    let mut hooks = EventHooks::default();
    let status_watcher = OrderStatusWatcher::new(db.clone(), Arc::clone(&push));
    let location_watcher = ClientLocationWatcher::new(db, push, config);
    // --- Order-Status Watcher ---
    hooks.on_order_updated(move |ev| {
        let watcher = status_watcher.clone();
        Box::pin(async move {
            match watcher.handle(&ev).await {
                Ok(OrderStatusOutcome::Unchanged) => {},
                Ok(OrderStatusOutcome::Notified { status, client, merchant, .. }) => {
                    let failed = client.failures.len() + merchant.failures.len();
                    if failed > 0 {
                        warn!("🔔️ {failed} notifications for order {} ({status}) could not be delivered", ev.order_id);
                    }
                },
                Err(e) => error!("🔔️ Notifications for order {} were abandoned. {e}", ev.order_id),
            }
        })
    });
    // --- Client-Location Watcher ---
    hooks.on_client_updated(move |ev| {
        let watcher = location_watcher.clone();
        Box::pin(async move {
            match watcher.handle(&ev).await {
                Ok(LocationOutcome::Evaluated { report, .. }) if !report.failures.is_empty() => {
                    warn!("📍️ {} proximity alerts for client {} could not be delivered", report.failures.len(), ev.uid);
                },
                Ok(_) => {},
                Err(e) => error!("📍️ Location update for client {} was abandoned. {e}", ev.uid),
            }
        })
    });
    hooks
}
