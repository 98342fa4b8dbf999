use std::future::Future;

use crate::{
    db::traits::StoreError,
    db_types::{PushToken, TokenOwner},
};

/// The push-token sub-collection hanging off clients and merchants.
pub trait TokenManagement {
    /// Every token registered for `owner`. Owners without tokens yield an empty list.
    fn fetch_tokens(&self, owner: &TokenOwner) -> impl Future<Output = Result<Vec<PushToken>, StoreError>> + Send;

    /// Registers `token` for `owner`. Registering the same token twice is a no-op. Returns true if the token was new.
    fn register_token(
        &self,
        owner: &TokenOwner,
        token: &PushToken,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Returns true if a token was removed.
    fn remove_token(
        &self,
        owner: &TokenOwner,
        token: &PushToken,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
