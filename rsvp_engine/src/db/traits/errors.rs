use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The document was not found: {0}")]
    DocumentNotFound(String),
    #[error("The document already exists: {0}")]
    DocumentAlreadyExists(String),
}
