use std::future::Future;

use crate::{
    db::traits::StoreError,
    db_types::{Client, ClientId, Merchant, MerchantId},
};

/// Reading and writing client and merchant documents.
pub trait ClientManagement {
    fn fetch_client(&self, uid: &ClientId) -> impl Future<Output = Result<Option<Client>, StoreError>> + Send;

    fn fetch_merchant(&self, id: &MerchantId) -> impl Future<Output = Result<Option<Merchant>, StoreError>> + Send;

    /// Creates the client, or overwrites every field of an existing one.
    fn upsert_client(&self, client: Client) -> impl Future<Output = Result<Client, StoreError>> + Send;

    fn upsert_merchant(&self, merchant: Merchant) -> impl Future<Output = Result<Merchant, StoreError>> + Send;

    /// Sets `locationCoordinate` and returns the updated client.
    fn update_client_location(
        &self,
        uid: &ClientId,
        location: &str,
    ) -> impl Future<Output = Result<Client, StoreError>> + Send;

    /// Sets the `nearFCMSent` flag. This is a plain field write: there is no compare-and-swap.
    fn set_near_fcm_sent(&self, uid: &ClientId, sent: bool) -> impl Future<Output = Result<(), StoreError>> + Send;
}
