use std::sync::Arc;

use log::*;

use crate::{
    db::traits::NotificationDatabase,
    db_types::{OrderStatusType, TokenOwner},
    events::OrderUpdatedEvent,
    helpers::{status_message, Recipient},
    notifier::{fan_out, resolve_tokens, FanOutReport, PushDelivery},
    watchers::WatcherError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatusOutcome {
    /// The status history did not change length, or is empty after the write. Nothing was sent.
    Unchanged,
    Notified {
        status: OrderStatusType,
        /// True when the client's `nearFCMSent` flag was cleared before sending.
        flag_reset: bool,
        client: FanOutReport,
        merchant: FanOutReport,
    },
}

/// Notifies both parties of a reservation whenever its status history changes length.
pub struct OrderStatusWatcher<B, P> {
    db: B,
    push: Arc<P>,
}

impl<B: Clone, P> Clone for OrderStatusWatcher<B, P> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), push: Arc::clone(&self.push) }
    }
}

impl<B, P> OrderStatusWatcher<B, P>
where
    B: NotificationDatabase,
    P: PushDelivery,
{
    pub fn new(db: B, push: Arc<P>) -> Self {
        Self { db, push }
    }

    pub async fn handle(&self, event: &OrderUpdatedEvent) -> Result<OrderStatusOutcome, WatcherError> {
        let order_id = &event.order_id;
        if !event.status_history_length_changed() {
            debug!("🔔️ No status change for order {order_id}");
            return Ok(OrderStatusOutcome::Unchanged);
        }
        let order = &event.after;
        let Some(status) = order.latest_status().cloned() else {
            warn!("🔔️ The status history of order {order_id} is empty. There is nothing to announce.");
            return Ok(OrderStatusOutcome::Unchanged);
        };
        info!("🔔️ Order {order_id} is now {status}");

        let flag_reset = status.is_terminal();
        if flag_reset {
            self.db.set_near_fcm_sent(&order.user_uid, false).await.map_err(WatcherError::WriteFailed)?;
            debug!("🔔️ Proximity flag cleared for client {}", order.user_uid);
        }

        let client_owner = TokenOwner::Client(order.user_uid.clone());
        let merchant_owner = TokenOwner::Merchant(order.merchant_uid.clone());
        let (client_tokens, merchant_tokens) =
            tokio::try_join!(resolve_tokens(&self.db, &client_owner), resolve_tokens(&self.db, &merchant_owner))
                .map_err(WatcherError::QueryFailed)?;

        let client_message = status_message(&status, Recipient::Client);
        let merchant_message = status_message(&status, Recipient::Merchant);
        let (client, merchant) = tokio::join!(
            fan_out(self.push.as_ref(), &client_tokens, &client_message),
            fan_out(self.push.as_ref(), &merchant_tokens, &merchant_message)
        );
        debug!(
            "🔔️ Order {order_id}: {}/{} client and {}/{} merchant notifications delivered",
            client.delivered,
            client.attempted(),
            merchant.delivered,
            merchant.attempted()
        );
        Ok(OrderStatusOutcome::Notified { status, flag_reset, client, merchant })
    }
}
