use thiserror::Error;

use crate::db::traits::StoreError;

#[derive(Debug, Clone, Error)]
pub enum WatcherError {
    #[error("Could not read from the document store. {0}")]
    QueryFailed(StoreError),
    #[error("Could not write to the document store. {0}")]
    WriteFailed(StoreError),
}
