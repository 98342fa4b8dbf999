use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{PushToken, TokenOwner},
};

pub async fn fetch_tokens(owner: &TokenOwner, conn: &mut SqliteConnection) -> Result<Vec<PushToken>, SqliteDatabaseError> {
    let tokens: Vec<String> =
        sqlx::query_scalar("SELECT token FROM push_tokens WHERE owner_kind = $1 AND owner_id = $2 ORDER BY id")
            .bind(owner.kind().to_string())
            .bind(owner.id())
            .fetch_all(conn)
            .await?;
    Ok(tokens.into_iter().map(PushToken).collect())
}

pub async fn insert_token(
    owner: &TokenOwner,
    token: &PushToken,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("INSERT OR IGNORE INTO push_tokens (owner_kind, owner_id, token) VALUES ($1, $2, $3)")
        .bind(owner.kind().to_string())
        .bind(owner.id())
        .bind(token.as_str())
        .execute(conn)
        .await?;
    let inserted = result.rows_affected() > 0;
    if inserted {
        debug!("🗃️ New push token registered for {owner}");
    }
    Ok(inserted)
}

pub async fn delete_token(
    owner: &TokenOwner,
    token: &PushToken,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM push_tokens WHERE owner_kind = $1 AND owner_id = $2 AND token = $3")
        .bind(owner.kind().to_string())
        .bind(owner.id())
        .bind(token.as_str())
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
