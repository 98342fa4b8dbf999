//! # Document store contracts
//!
//! The watchers never talk to a database directly. They depend on the traits in this module, which describe the small
//! set of document operations they need:
//!
//! * [`OrderManagement`] fetches orders by id and by owning client, and appends to an order's status history.
//! * [`ClientManagement`] reads and updates client and merchant documents, including the `nearFCMSent` flag.
//! * [`TokenManagement`] resolves and maintains the push tokens registered under a client or merchant.
//!
//! [`NotificationDatabase`] bundles all three. The SQLite backend implements it, as does the in-memory store used in
//! tests.
mod client_management;
mod errors;
mod order_management;
mod token_management;

pub use client_management::ClientManagement;
pub use errors::StoreError;
pub use order_management::OrderManagement;
pub use token_management::TokenManagement;

/// Everything the watchers and the document API need from a backend.
pub trait NotificationDatabase:
    OrderManagement + ClientManagement + TokenManagement + Clone + Send + Sync + 'static
{
    /// The URL of the database
    fn url(&self) -> &str;
}
