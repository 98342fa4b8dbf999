use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{ClientId, MerchantId, NewOrder, Order, OrderId, OrderStatusType},
};

#[derive(Debug, Clone, FromRow)]
struct OrderRow {
    id: OrderId,
    user_uid: ClientId,
    merchant_uid: MerchantId,
    order_date: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, order_status: Vec<OrderStatusType>) -> Order {
        Order {
            id: self.id,
            user_uid: self.user_uid,
            merchant_uid: self.merchant_uid,
            order_status,
            order_date: self.order_date,
        }
    }
}

pub async fn fetch_order(id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let row: Option<OrderRow> =
        sqlx::query_as("SELECT id, user_uid, merchant_uid, order_date FROM orders WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&mut *conn)
            .await?;
    match row {
        Some(row) => {
            let history = fetch_status_history(&row.id, conn).await?;
            Ok(Some(row.into_order(history)))
        },
        None => Ok(None),
    }
}

pub async fn fetch_orders_for_client(
    uid: &ClientId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, SqliteDatabaseError> {
    let rows: Vec<OrderRow> =
        sqlx::query_as("SELECT id, user_uid, merchant_uid, order_date FROM orders WHERE user_uid = $1 ORDER BY id")
            .bind(uid.as_str())
            .fetch_all(&mut *conn)
            .await?;
    trace!("🗃️ {} orders found for client {uid}", rows.len());
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let history = fetch_status_history(&row.id, conn).await?;
        orders.push(row.into_order(history));
    }
    Ok(orders)
}

/// The status history of the order, oldest first.
pub async fn fetch_status_history(
    id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderStatusType>, SqliteDatabaseError> {
    let statuses: Vec<String> = sqlx::query_scalar("SELECT status FROM order_statuses WHERE order_id = $1 ORDER BY seq")
        .bind(id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(statuses.into_iter().map(OrderStatusType::from).collect())
}

/// Inserts a new order along with the first entry of its status history. This is not atomic. Embed the call in a
/// transaction and pass `&mut tx` as the connection if you need that.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, SqliteDatabaseError> {
    let exists: Option<String> = sqlx::query_scalar("SELECT id FROM orders WHERE id = $1")
        .bind(order.id.as_str())
        .fetch_optional(&mut *conn)
        .await?;
    if exists.is_some() {
        return Err(SqliteDatabaseError::DuplicateOrder(order.id.to_string()));
    }
    sqlx::query("INSERT INTO orders (id, user_uid, merchant_uid, order_date) VALUES ($1, $2, $3, $4)")
        .bind(order.id.as_str())
        .bind(order.user_uid.as_str())
        .bind(order.merchant_uid.as_str())
        .bind(order.order_date)
        .execute(&mut *conn)
        .await?;
    insert_status(&order.id, &order.initial_status, conn).await?;
    debug!("🗃️ Order {} saved for client {} with merchant {}", order.id, order.user_uid, order.merchant_uid);
    Ok(order.into_order())
}

/// Appends `status` to the history of order `id` and returns the updated order.
pub async fn append_status(
    id: &OrderId,
    status: &OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, SqliteDatabaseError> {
    let updated = sqlx::query("UPDATE orders SET updated_at = CURRENT_TIMESTAMP WHERE id = $1")
        .bind(id.as_str())
        .execute(&mut *conn)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(SqliteDatabaseError::OrderNotFound(id.to_string()));
    }
    insert_status(id, status, conn).await?;
    debug!("🗃️ Order {id} moved to {status}");
    fetch_order(id, conn).await?.ok_or_else(|| SqliteDatabaseError::OrderNotFound(id.to_string()))
}

async fn insert_status(
    id: &OrderId,
    status: &OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO order_statuses (order_id, status) VALUES ($1, $2)")
        .bind(id.as_str())
        .bind(status.as_str())
        .execute(conn)
        .await?;
    Ok(())
}
