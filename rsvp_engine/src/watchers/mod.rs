//! # Watchers
//!
//! The two reactive handlers that turn document changes into push notifications.
//!
//! * [`OrderStatusWatcher`] runs whenever an order document changes. If the status history changed length, the client
//!   and the merchant are told about the latest status. A terminal status also clears the client's `nearFCMSent` flag, so that
//!   their next reservation can trigger another proximity alert.
//! * [`ClientLocationWatcher`] runs whenever a client document changes. When a client who has not been flagged yet
//!   moves to within the proximity threshold of a merchant they have a paid reservation with, and that reservation is
//!   about to start, the merchant is told their customer is approaching.
//!
//! Each handler invocation is independent. Delivery failures are logged and swallowed. A failed document query or
//! write aborts the invocation with a [`WatcherError`].
//!
//! [`watcher_hooks`] wires both watchers into a set of [`crate::events::EventHooks`].
mod client_location_watcher;
mod errors;
mod hooks;
mod order_status_watcher;

pub use client_location_watcher::{ClientLocationWatcher, LocationOutcome};
pub use errors::WatcherError;
pub use hooks::watcher_hooks;
pub use order_status_watcher::{OrderStatusOutcome, OrderStatusWatcher};
