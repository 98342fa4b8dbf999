use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use tokio::sync::RwLock;

use crate::{
    db::traits::{ClientManagement, NotificationDatabase, OrderManagement, StoreError, TokenManagement},
    db_types::{Client, ClientId, Merchant, MerchantId, NewOrder, Order, OrderId, OrderStatusType, PushToken, TokenOwner},
};

/// An in-memory document store. Clones share the same documents.
///
/// It counts order queries, token queries and `nearFCMSent` writes so that tests can check what a watcher touched,
/// and [`Self::fail_queries`] makes every read fail.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<MemoryStore>,
}

#[derive(Default)]
struct MemoryStore {
    orders: RwLock<HashMap<OrderId, Order>>,
    clients: RwLock<HashMap<ClientId, Client>>,
    merchants: RwLock<HashMap<MerchantId, Merchant>>,
    tokens: RwLock<HashMap<TokenOwner, Vec<PushToken>>>,
    order_queries: AtomicUsize,
    token_queries: AtomicUsize,
    flag_writes: AtomicUsize,
    fail_queries: AtomicBool,
}

impl MemoryDatabase {
    pub async fn add_token(&self, owner: TokenOwner, token: &str) {
        self.inner.tokens.write().await.entry(owner).or_default().push(PushToken::from(token));
    }

    pub fn order_queries(&self) -> usize {
        self.inner.order_queries.load(Ordering::SeqCst)
    }

    pub fn token_queries(&self) -> usize {
        self.inner.token_queries.load(Ordering::SeqCst)
    }

    pub fn flag_writes(&self) -> usize {
        self.inner.flag_writes.load(Ordering::SeqCst)
    }

    pub fn fail_queries(&self, fail: bool) {
        self.inner.fail_queries.store(fail, Ordering::SeqCst);
    }

    fn check_query(&self) -> Result<(), StoreError> {
        if self.inner.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::DatabaseError("Simulated query failure".into()));
        }
        Ok(())
    }
}

impl NotificationDatabase for MemoryDatabase {
    fn url(&self) -> &str {
        "memory://"
    }
}

impl OrderManagement for MemoryDatabase {
    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        self.check_query()?;
        Ok(self.inner.orders.read().await.get(id).cloned())
    }

    async fn fetch_orders_for_client(&self, uid: &ClientId) -> Result<Vec<Order>, StoreError> {
        self.inner.order_queries.fetch_add(1, Ordering::SeqCst);
        self.check_query()?;
        let orders = self.inner.orders.read().await;
        let mut result = orders.values().filter(|o| &o.user_uid == uid).cloned().collect::<Vec<_>>();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut orders = self.inner.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::DocumentAlreadyExists(format!("orders/{}", order.id)));
        }
        let order = order.into_order();
        orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn append_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, StoreError> {
        let mut orders = self.inner.orders.write().await;
        let order = orders.get_mut(id).ok_or_else(|| StoreError::DocumentNotFound(format!("orders/{id}")))?;
        order.order_status.push(status);
        Ok(order.clone())
    }
}

impl ClientManagement for MemoryDatabase {
    async fn fetch_client(&self, uid: &ClientId) -> Result<Option<Client>, StoreError> {
        self.check_query()?;
        Ok(self.inner.clients.read().await.get(uid).cloned())
    }

    async fn fetch_merchant(&self, id: &MerchantId) -> Result<Option<Merchant>, StoreError> {
        self.check_query()?;
        Ok(self.inner.merchants.read().await.get(id).cloned())
    }

    async fn upsert_client(&self, client: Client) -> Result<Client, StoreError> {
        self.inner.clients.write().await.insert(client.uid.clone(), client.clone());
        Ok(client)
    }

    async fn upsert_merchant(&self, merchant: Merchant) -> Result<Merchant, StoreError> {
        self.inner.merchants.write().await.insert(merchant.id.clone(), merchant.clone());
        Ok(merchant)
    }

    async fn update_client_location(&self, uid: &ClientId, location: &str) -> Result<Client, StoreError> {
        let mut clients = self.inner.clients.write().await;
        let client = clients.get_mut(uid).ok_or_else(|| StoreError::DocumentNotFound(format!("clients/{uid}")))?;
        client.location_coordinate = location.to_string();
        Ok(client.clone())
    }

    async fn set_near_fcm_sent(&self, uid: &ClientId, sent: bool) -> Result<(), StoreError> {
        self.inner.flag_writes.fetch_add(1, Ordering::SeqCst);
        let mut clients = self.inner.clients.write().await;
        let client = clients.get_mut(uid).ok_or_else(|| StoreError::DocumentNotFound(format!("clients/{uid}")))?;
        client.near_fcm_sent = sent;
        Ok(())
    }
}

impl TokenManagement for MemoryDatabase {
    async fn fetch_tokens(&self, owner: &TokenOwner) -> Result<Vec<PushToken>, StoreError> {
        self.inner.token_queries.fetch_add(1, Ordering::SeqCst);
        self.check_query()?;
        Ok(self.inner.tokens.read().await.get(owner).cloned().unwrap_or_default())
    }

    async fn register_token(&self, owner: &TokenOwner, token: &PushToken) -> Result<bool, StoreError> {
        let mut tokens = self.inner.tokens.write().await;
        let list = tokens.entry(owner.clone()).or_default();
        if list.contains(token) {
            return Ok(false);
        }
        list.push(token.clone());
        Ok(true)
    }

    async fn remove_token(&self, owner: &TokenOwner, token: &PushToken) -> Result<bool, StoreError> {
        let mut tokens = self.inner.tokens.write().await;
        let Some(list) = tokens.get_mut(owner) else {
            return Ok(false);
        };
        let len = list.len();
        list.retain(|t| t != token);
        Ok(list.len() != len)
    }
}
