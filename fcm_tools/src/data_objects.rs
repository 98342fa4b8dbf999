use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new<S: Into<String>, B: Into<String>>(title: S, body: B) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

/// A message addressed to exactly one device registration token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub token: String,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendRequest<'a> {
    pub validate_only: bool,
    pub message: &'a Message,
}

/// FCM's acknowledgment of an accepted message. `name` looks like `projects/{project}/messages/{message_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageReceipt {
    pub name: String,
}

impl MessageReceipt {
    pub fn message_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
}

impl ErrorBody {
    pub fn is_unregistered(&self) -> bool {
        self.details.iter().any(|d| d.error_code.as_deref() == Some("UNREGISTERED"))
    }
}
