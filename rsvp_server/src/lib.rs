//! # RSVP notification server
//! This crate hosts the reservation notifier as an HTTP service. It is responsible for:
//! Receiving document changes, either through its own document endpoints or from an external database's change feed.
//! Publishing each change to the order-status and client-location watchers.
//! Delivering the resulting push notifications through Firebase Cloud Messaging.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/triggers/orders/{id}`, `/triggers/clients/{uid}`: Change-feed endpoints. Post a `{"before", "after"}` pair of
//!   documents here to run the watchers against it.
//! * `/orders`, `/clients`, `/merchants`, `/tokens`: The built-in document store.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
