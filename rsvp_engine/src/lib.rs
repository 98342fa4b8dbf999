//! RSVP Notification Engine
//!
//! The engine turns changes to reservation documents into push notifications. It is transport-agnostic: documents
//! live behind the store traits (see [`NotificationDatabase`]), and notifications leave through the
//! [`notifier::PushDelivery`] trait.
//!
//! The library is divided into these sections:
//! 1. Document storage. The watchers only see the [`NotificationDatabase`] traits. A SQLite backend is provided
//!    ([`SqliteDatabase`]), and the data types used by every backend are defined in [`mod@db_types`].
//! 2. The change feed ([`mod@events`]). Every update to an order or client document is published as a before/after
//!    pair. Hooks subscribe to these events and are run concurrently, one task per event.
//! 3. The [`mod@watchers`]. The order-status watcher notifies clients and merchants when a reservation's status
//!    changes. The client-location watcher tells a merchant when their customer is close by.
//! 4. The [`DocumentApi`], which writes documents and publishes the resulting change events.
//!
//! [`helpers`](mod@helpers) holds the pure functions the watchers are built on: the status message table, the
//! Haversine distance and the reservation lead window. [`config::NotifierConfig`] carries the tunables.
mod db;

pub mod config;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod notifier;
mod rsvp_api;
pub mod watchers;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{ClientManagement, NotificationDatabase, OrderManagement, StoreError, TokenManagement};
pub use rsvp_api::document_api::DocumentApi;
