use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Client, ClientId, Merchant, MerchantId},
};

pub async fn fetch_client(uid: &ClientId, conn: &mut SqliteConnection) -> Result<Option<Client>, SqliteDatabaseError> {
    let client: Option<(String, String, bool)> =
        sqlx::query_as("SELECT uid, location_coordinate, near_fcm_sent FROM clients WHERE uid = $1")
            .bind(uid.as_str())
            .fetch_optional(conn)
            .await?;
    Ok(client.map(|(uid, location_coordinate, near_fcm_sent)| Client {
        uid: ClientId(uid),
        location_coordinate,
        near_fcm_sent,
    }))
}

pub async fn upsert_client(client: &Client, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        r#"
            INSERT INTO clients (uid, location_coordinate, near_fcm_sent) VALUES ($1, $2, $3)
            ON CONFLICT (uid) DO UPDATE SET
                location_coordinate = excluded.location_coordinate,
                near_fcm_sent = excluded.near_fcm_sent,
                updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(client.uid.as_str())
    .bind(client.location_coordinate.as_str())
    .bind(client.near_fcm_sent)
    .execute(conn)
    .await?;
    debug!("🗃️ Client {} saved", client.uid);
    Ok(())
}

pub async fn update_location(
    uid: &ClientId,
    location: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let result =
        sqlx::query("UPDATE clients SET location_coordinate = $1, updated_at = CURRENT_TIMESTAMP WHERE uid = $2")
            .bind(location)
            .bind(uid.as_str())
            .execute(conn)
            .await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::ClientNotFound(uid.to_string()));
    }
    trace!("🗃️ Client {uid} is now at {location}");
    Ok(())
}

pub async fn set_near_fcm_sent(
    uid: &ClientId,
    sent: bool,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let result = sqlx::query("UPDATE clients SET near_fcm_sent = $1, updated_at = CURRENT_TIMESTAMP WHERE uid = $2")
        .bind(sent)
        .bind(uid.as_str())
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::ClientNotFound(uid.to_string()));
    }
    debug!("🗃️ nearFCMSent for client {uid} set to {sent}");
    Ok(())
}

pub async fn fetch_merchant(
    id: &MerchantId,
    conn: &mut SqliteConnection,
) -> Result<Option<Merchant>, SqliteDatabaseError> {
    let merchant: Option<(String, String)> =
        sqlx::query_as("SELECT id, location_coordinate FROM merchants WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(conn)
            .await?;
    Ok(merchant.map(|(id, location_coordinate)| Merchant { id: MerchantId(id), location_coordinate }))
}

pub async fn upsert_merchant(merchant: &Merchant, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        r#"
            INSERT INTO merchants (id, location_coordinate) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET
                location_coordinate = excluded.location_coordinate,
                updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(merchant.id.as_str())
    .bind(merchant.location_coordinate.as_str())
    .execute(conn)
    .await?;
    debug!("🗃️ Merchant {} saved", merchant.id);
    Ok(())
}
