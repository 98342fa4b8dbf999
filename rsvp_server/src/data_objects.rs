use std::fmt::Display;

use rsvp_engine::db_types::{OrderStatusType, PushToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The body of a change-feed trigger: a document as it was before and after a single write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChange<T> {
    pub before: T,
    pub after: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub location_coordinate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRegistration {
    pub token: PushToken,
}
