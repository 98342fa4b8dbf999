//! Resolving push tokens and sending notifications to them.
//!
//! The push service itself sits behind the [`PushDelivery`] trait. [`fan_out`] sends one message to many tokens at
//! once, waits for every send to finish and reports the failures instead of propagating them.
mod delivery;
mod sender;
mod tokens;

pub use delivery::{DeliveryError, DeliveryReceipt, PushDelivery, PushNotification};
pub use sender::{fan_out, send_notification, FanOutReport};
pub use tokens::resolve_tokens;
