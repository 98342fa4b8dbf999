//! # Document API
//!
//! [`DocumentApi`] is how documents change when this service hosts the document store itself. Every update captures
//! the document before and after the write and publishes the pair on the change feed. The watchers subscribe to that
//! feed, which makes the API the equivalent of a database update trigger.
//!
//! Creating a document does not publish anything. Only updates to existing documents are announced.
//!
//! ```rust,ignore
//! use rsvp_engine::{DocumentApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = DocumentApi::new(db, handlers.producers());
//! api.append_order_status(&order_id, OrderStatusType::WaitingPayment).await?;
//! ```
pub mod document_api;
