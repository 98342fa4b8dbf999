use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{NotificationDatabase, StoreError},
    db_types::{Client, ClientId, Merchant, NewOrder, Order, OrderId, OrderStatusType, PushToken, TokenOwner},
    events::{ClientUpdatedEvent, EventProducers, EventType, OrderUpdatedEvent},
};

pub struct DocumentApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for DocumentApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentApi")
    }
}

impl<B: Clone> Clone for DocumentApi<B> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), producers: self.producers.clone() }
    }
}

impl<B> DocumentApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> DocumentApi<B>
where B: NotificationDatabase
{
    /// Stores a brand-new order. No change event is published for new documents.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let order = self.db.insert_order(order).await?;
        info!("📬️ Order {} created for client {} with merchant {}", order.id, order.user_uid, order.merchant_uid);
        Ok(order)
    }

    /// Appends `status` to the order's status history and announces the change.
    pub async fn append_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, StoreError> {
        let before = self.fetch_existing_order(id).await?;
        let after = self.db.append_order_status(id, status).await?;
        debug!("📬️ Order {id} status is now {}", after.latest_status().map(|s| s.as_str()).unwrap_or("empty"));
        self.publish_order_update(OrderUpdatedEvent::new(id.clone(), before, after.clone())).await;
        Ok(after)
    }

    pub async fn update_client_location(&self, uid: &ClientId, location: &str) -> Result<Client, StoreError> {
        let before = self.fetch_existing_client(uid).await?;
        let after = self.db.update_client_location(uid, location).await?;
        trace!("📬️ Client {uid} moved to {location}");
        self.publish_client_update(ClientUpdatedEvent::new(uid.clone(), before, after.clone())).await;
        Ok(after)
    }

    /// Creates or replaces a client document. Replacing an existing client is announced as an update.
    pub async fn upsert_client(&self, client: Client) -> Result<Client, StoreError> {
        let before = self.db.fetch_client(&client.uid).await?;
        let after = self.db.upsert_client(client).await?;
        match before {
            Some(before) => {
                let event = ClientUpdatedEvent::new(after.uid.clone(), before, after.clone());
                self.publish_client_update(event).await;
            },
            None => info!("📬️ Client {} created", after.uid),
        }
        Ok(after)
    }

    pub async fn upsert_merchant(&self, merchant: Merchant) -> Result<Merchant, StoreError> {
        let merchant = self.db.upsert_merchant(merchant).await?;
        debug!("📬️ Merchant {} saved at {}", merchant.id, merchant.location_coordinate);
        Ok(merchant)
    }

    pub async fn register_token(&self, owner: &TokenOwner, token: &PushToken) -> Result<bool, StoreError> {
        let is_new = self.db.register_token(owner, token).await?;
        if is_new {
            debug!("📬️ New push token registered for {owner}");
        }
        Ok(is_new)
    }

    pub async fn remove_token(&self, owner: &TokenOwner, token: &PushToken) -> Result<bool, StoreError> {
        self.db.remove_token(owner, token).await
    }

    pub async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        self.db.fetch_order(id).await
    }

    pub async fn fetch_client(&self, uid: &ClientId) -> Result<Option<Client>, StoreError> {
        self.db.fetch_client(uid).await
    }

    pub async fn fetch_tokens(&self, owner: &TokenOwner) -> Result<Vec<PushToken>, StoreError> {
        self.db.fetch_tokens(owner).await
    }

    async fn fetch_existing_order(&self, id: &OrderId) -> Result<Order, StoreError> {
        self.db.fetch_order(id).await?.ok_or_else(|| StoreError::DocumentNotFound(format!("orders/{id}")))
    }

    async fn fetch_existing_client(&self, uid: &ClientId) -> Result<Client, StoreError> {
        self.db.fetch_client(uid).await?.ok_or_else(|| StoreError::DocumentNotFound(format!("clients/{uid}")))
    }
}

impl<B> DocumentApi<B> {
    /// Announces an order update. External change feeds use this directly.
    pub async fn publish_order_update(&self, event: OrderUpdatedEvent) {
        trace!("📬️ Publishing update for order {}", event.order_id);
        self.producers.publish(EventType::OrderUpdated(event)).await;
    }

    /// Announces a client update. External change feeds use this directly.
    pub async fn publish_client_update(&self, event: ClientUpdatedEvent) {
        trace!("📬️ Publishing update for client {}", event.uid);
        self.producers.publish(EventType::ClientUpdated(event)).await;
    }
}
