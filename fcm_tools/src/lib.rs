//! A thin client for the Firebase Cloud Messaging (FCM) HTTP v1 API.
//!
//! Only the "send to a single device token" call is supported, since that is all the reservation notifier needs.
mod api;
mod auth;
mod config;
mod data_objects;
mod error;

pub use api::FcmApi;
pub use config::{FcmConfig, FcmCredentials, ServiceAccountKey};
pub use data_objects::{Message, MessageReceipt, Notification};
pub use error::FcmApiError;
