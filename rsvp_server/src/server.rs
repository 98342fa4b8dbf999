use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use rsvp_engine::{events::EventProducers, DocumentApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::fcm::{create_notification_event_handlers, FcmPushDelivery},
    routes::configure_routes,
};

/// How long in-flight notifications get to finish once the HTTP server has stopped.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    if config.fcm.credentials.is_empty() {
        warn!("🚀️ No FCM credentials are configured. Every push notification will be rejected.");
    }
    let push = FcmPushDelivery::new(config.fcm.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers =
        create_notification_event_handlers(db.clone(), push, config.notifier.clone(), config.event_buffer_size);
    let producers = handlers.producers();
    let tasks = handlers.start_handlers();
    info!("🚀️ Watchers are listening for document changes");

    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))?;

    info!("🚀️ Server stopped. Waiting for in-flight notifications to complete.");
    for task in tasks {
        match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, task).await {
            Ok(Ok(n)) => debug!("🚀️ Event handler finished after {n} events"),
            Ok(Err(e)) => error!("🚀️ Event handler task failed. {e}"),
            Err(_) => warn!("🚀️ Gave up waiting for an event handler after {}s", SHUTDOWN_GRACE_PERIOD.as_secs()),
        }
    }
    Ok(())
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let documents_api = DocumentApi::new(db.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rsvp::access_log"))
            .app_data(web::Data::new(documents_api))
            .configure(configure_routes::<SqliteDatabase>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
