use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{clients, db_url, new_pool, orders, tokens, SqliteDatabaseError};
use crate::{
    db::traits::{ClientManagement, NotificationDatabase, OrderManagement, StoreError, TokenManagement},
    db_types::{Client, ClientId, Merchant, MerchantId, NewOrder, Order, OrderId, OrderStatusType, PushToken, TokenOwner},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `RSVP_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl NotificationDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order(id, &mut conn).await?)
    }

    async fn fetch_orders_for_client(&self, uid: &ClientId) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_client(uid, &mut conn).await?)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn append_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::append_status(id, &status, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }
}

impl ClientManagement for SqliteDatabase {
    async fn fetch_client(&self, uid: &ClientId) -> Result<Option<Client>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(clients::fetch_client(uid, &mut conn).await?)
    }

    async fn fetch_merchant(&self, id: &MerchantId) -> Result<Option<Merchant>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(clients::fetch_merchant(id, &mut conn).await?)
    }

    async fn upsert_client(&self, client: Client) -> Result<Client, StoreError> {
        let mut conn = self.pool.acquire().await?;
        clients::upsert_client(&client, &mut conn).await?;
        Ok(client)
    }

    async fn upsert_merchant(&self, merchant: Merchant) -> Result<Merchant, StoreError> {
        let mut conn = self.pool.acquire().await?;
        clients::upsert_merchant(&merchant, &mut conn).await?;
        Ok(merchant)
    }

    async fn update_client_location(&self, uid: &ClientId, location: &str) -> Result<Client, StoreError> {
        let mut tx = self.pool.begin().await?;
        clients::update_location(uid, location, &mut tx).await?;
        let client = clients::fetch_client(uid, &mut tx)
            .await?
            .ok_or_else(|| SqliteDatabaseError::ClientNotFound(uid.to_string()))?;
        tx.commit().await?;
        Ok(client)
    }

    async fn set_near_fcm_sent(&self, uid: &ClientId, sent: bool) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(clients::set_near_fcm_sent(uid, sent, &mut conn).await?)
    }
}

impl TokenManagement for SqliteDatabase {
    async fn fetch_tokens(&self, owner: &TokenOwner) -> Result<Vec<PushToken>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tokens::fetch_tokens(owner, &mut conn).await?)
    }

    async fn register_token(&self, owner: &TokenOwner, token: &PushToken) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tokens::insert_token(owner, token, &mut conn).await?)
    }

    async fn remove_token(&self, owner: &TokenOwner, token: &PushToken) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tokens::delete_token(owner, token, &mut conn).await?)
    }
}
