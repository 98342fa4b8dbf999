use std::future::Future;

use crate::{
    db::traits::StoreError,
    db_types::{ClientId, NewOrder, Order, OrderId, OrderStatusType},
};

/// Reading and writing order documents.
pub trait OrderManagement {
    fn fetch_order(&self, id: &OrderId) -> impl Future<Output = Result<Option<Order>, StoreError>> + Send;

    /// All orders whose `userUid` equals `uid`, in no particular order.
    fn fetch_orders_for_client(&self, uid: &ClientId) -> impl Future<Output = Result<Vec<Order>, StoreError>> + Send;

    /// Stores a brand-new order. Fails with [`StoreError::DocumentAlreadyExists`] if the id is taken.
    fn insert_order(&self, order: NewOrder) -> impl Future<Output = Result<Order, StoreError>> + Send;

    /// Appends `status` to the order's status history and returns the updated order.
    fn append_order_status(
        &self,
        id: &OrderId,
        status: OrderStatusType,
    ) -> impl Future<Output = Result<Order, StoreError>> + Send;
}
