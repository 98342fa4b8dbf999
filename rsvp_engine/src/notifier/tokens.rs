use log::*;

use crate::{
    db::traits::{StoreError, TokenManagement},
    db_types::{PushToken, TokenOwner},
};

/// All distinct push tokens registered for `owner`, in registration order. An owner with no tokens resolves to an
/// empty list.
pub async fn resolve_tokens<B: TokenManagement>(db: &B, owner: &TokenOwner) -> Result<Vec<PushToken>, StoreError> {
    let mut tokens = db.fetch_tokens(owner).await?;
    let mut seen = std::collections::HashSet::with_capacity(tokens.len());
    tokens.retain(|t| seen.insert(t.clone()));
    trace!("📨️ {} push tokens found for {owner}", tokens.len());
    Ok(tokens)
}
