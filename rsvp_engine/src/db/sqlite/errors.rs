use thiserror::Error;

use crate::db::traits::StoreError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Order {0} does not exist")]
    OrderNotFound(String),
    #[error("Client {0} does not exist")]
    ClientNotFound(String),
    #[error("Order {0} already exists")]
    DuplicateOrder(String),
}

impl From<SqliteDatabaseError> for StoreError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::OrderNotFound(id) => StoreError::DocumentNotFound(format!("orders/{id}")),
            SqliteDatabaseError::ClientNotFound(id) => StoreError::DocumentNotFound(format!("clients/{id}")),
            SqliteDatabaseError::DuplicateOrder(id) => StoreError::DocumentAlreadyExists(format!("orders/{id}")),
            e => StoreError::DatabaseError(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}
