use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use log::*;

use crate::{
    config::NotifierConfig,
    db::traits::NotificationDatabase,
    db_types::{Order, OrderId, OrderStatusType, TokenOwner},
    events::ClientUpdatedEvent,
    helpers::{distance_km, is_within_lead_window, Coordinate, PROXIMITY_MESSAGE},
    notifier::{fan_out, resolve_tokens, FanOutReport, PushDelivery},
    watchers::WatcherError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationOutcome {
    LocationUnchanged,
    /// The client has already triggered a proximity alert that has not been reset yet.
    AlreadyNotified,
    /// The client has no orders. The proximity flag was left alone.
    NoOrders,
    /// Every order was evaluated and the proximity flag was set.
    Evaluated { orders_found: usize, notified: Vec<OrderId>, report: FanOutReport },
}

/// Tells merchants when a customer with an imminent paid reservation is close by.
pub struct ClientLocationWatcher<B, P> {
    db: B,
    push: Arc<P>,
    config: NotifierConfig,
}

impl<B: Clone, P> Clone for ClientLocationWatcher<B, P> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), push: Arc::clone(&self.push), config: self.config.clone() }
    }
}

impl<B, P> ClientLocationWatcher<B, P>
where
    B: NotificationDatabase,
    P: PushDelivery,
{
    pub fn new(db: B, push: Arc<P>, config: NotifierConfig) -> Self {
        Self { db, push, config }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    pub async fn handle(&self, event: &ClientUpdatedEvent) -> Result<LocationOutcome, WatcherError> {
        self.handle_at(event, Utc::now()).await
    }

    /// As for [`Self::handle`], with the lead window measured from `now`.
    pub async fn handle_at(
        &self,
        event: &ClientUpdatedEvent,
        now: DateTime<Utc>,
    ) -> Result<LocationOutcome, WatcherError> {
        let uid = &event.uid;
        if !event.location_changed() {
            trace!("📍️ Client {uid} updated, but their location did not change");
            return Ok(LocationOutcome::LocationUnchanged);
        }
        if event.after.near_fcm_sent {
            debug!("📍️ Client {uid} has already triggered a proximity alert");
            return Ok(LocationOutcome::AlreadyNotified);
        }
        let orders = self.db.fetch_orders_for_client(uid).await.map_err(WatcherError::QueryFailed)?;
        if orders.is_empty() {
            debug!("📍️ Client {uid} has no orders");
            return Ok(LocationOutcome::NoOrders);
        }
        let location = Coordinate::parse(&event.after.location_coordinate);
        trace!("📍️ Client {uid} is at {location}. Checking {} orders", orders.len());

        let mut evaluations = Vec::new();
        for order in &orders {
            if order.latest_status() == Some(&OrderStatusType::OnProgress) &&
                is_within_lead_window(order, now, &self.config)
            {
                evaluations.push(self.evaluate_order(order, location));
            }
        }
        let mut notified = Vec::new();
        let mut report = FanOutReport::default();
        for result in join_all(evaluations).await {
            if let Some((id, sends)) = result? {
                notified.push(id);
                report = report.merge(sends);
            }
        }

        self.db.set_near_fcm_sent(uid, true).await.map_err(WatcherError::WriteFailed)?;
        info!(
            "📍️ Client {uid}: {} of {} orders triggered a proximity alert. Proximity flag set.",
            notified.len(),
            orders.len()
        );
        Ok(LocationOutcome::Evaluated { orders_found: orders.len(), notified, report })
    }

    /// Notifies the order's merchant if the client is inside the proximity threshold. Returns the order id and the
    /// send report if a notification went out.
    async fn evaluate_order(
        &self,
        order: &Order,
        client_location: Coordinate,
    ) -> Result<Option<(OrderId, FanOutReport)>, WatcherError> {
        let merchant_id = &order.merchant_uid;
        let Some(merchant) = self.db.fetch_merchant(merchant_id).await.map_err(WatcherError::QueryFailed)? else {
            warn!("📍️ Merchant {merchant_id} for order {} does not exist. Skipping this order.", order.id);
            return Ok(None);
        };
        let merchant_location = Coordinate::parse(&merchant.location_coordinate);
        let distance = distance_km(&client_location, &merchant_location);
        trace!("📍️ Order {}: client is {distance:.2} km from merchant {merchant_id}", order.id);
        // Malformed coordinates give a NaN distance, which fails this check
        let is_near = distance < self.config.proximity_threshold_km;
        if !is_near {
            return Ok(None);
        }
        let owner = TokenOwner::Merchant(merchant_id.clone());
        let tokens = resolve_tokens(&self.db, &owner).await.map_err(WatcherError::QueryFailed)?;
        let report = fan_out(self.push.as_ref(), &tokens, PROXIMITY_MESSAGE).await;
        info!("📍️ Merchant {merchant_id} told that the customer for order {} is {distance:.2} km away", order.id);
        Ok(Some((order.id.clone(), report)))
    }
}
