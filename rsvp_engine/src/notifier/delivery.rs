use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::PushToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

impl PushNotification {
    pub fn new<T: Into<String>, B: Into<String>>(title: T, body: B) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

/// The push service's acknowledgment of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("The push service no longer recognises token {0}")]
    UnregisteredToken(String),
    #[error("The push service rejected the message for token {token}. {reason}")]
    Rejected { token: String, reason: String },
    /// A failure that is not specific to the token, such as an unreachable service or bad credentials.
    #[error("The push service could not process the message. {0}")]
    Transport(String),
}

/// "Send to device token" semantics over some push-delivery service.
pub trait PushDelivery: Send + Sync + 'static {
    fn send_to_token(
        &self,
        token: &PushToken,
        notification: &PushNotification,
    ) -> impl Future<Output = Result<DeliveryReceipt, DeliveryError>> + Send;
}
