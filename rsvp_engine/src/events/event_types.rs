use serde::{Deserialize, Serialize};

use crate::db_types::{Client, ClientId, Order, OrderId};

/// An update to an order document: the snapshots on either side of a single write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdatedEvent {
    pub order_id: OrderId,
    pub before: Order,
    pub after: Order,
}

impl OrderUpdatedEvent {
    pub fn new(order_id: OrderId, before: Order, after: Order) -> Self {
        Self { order_id, before, after }
    }

    /// The status history changed length during this write, in either direction. Length is the only signal used to
    /// detect a status change: a shorter history counts too, and a status that is added and removed within the same
    /// write goes unnoticed.
    pub fn status_history_length_changed(&self) -> bool {
        self.before.status_count() != self.after.status_count()
    }
}

/// An update to a client document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientUpdatedEvent {
    pub uid: ClientId,
    pub before: Client,
    pub after: Client,
}

impl ClientUpdatedEvent {
    pub fn new(uid: ClientId, before: Client, after: Client) -> Self {
        Self { uid, before, after }
    }

    pub fn location_changed(&self) -> bool {
        self.before.location_coordinate != self.after.location_coordinate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventType {
    OrderUpdated(OrderUpdatedEvent),
    ClientUpdated(ClientUpdatedEvent),
}
