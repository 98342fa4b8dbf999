use thiserror::Error;

#[derive(Debug, Error)]
pub enum FcmApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not obtain an access token: {0}")]
    Authentication(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The device token is no longer registered: {0}")]
    UnregisteredToken(String),
    #[error("Send failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl FcmApiError {
    /// True if the failure is tied to the token itself (rather than the transport or the service), i.e. retrying the
    /// same token is pointless.
    pub fn is_token_error(&self) -> bool {
        match self {
            Self::UnregisteredToken(_) => true,
            Self::QueryError { status, .. } => *status == 400 || *status == 404,
            _ => false,
        }
    }
}
