use std::sync::Arc;

use fcm_tools::{FcmApi, FcmApiError, FcmConfig, Notification};
use log::*;
use rsvp_engine::{
    config::NotifierConfig,
    db_types::PushToken,
    events::EventHandlers,
    notifier::{DeliveryError, DeliveryReceipt, PushDelivery, PushNotification},
    watchers::watcher_hooks,
    NotificationDatabase,
};

/// Delivers the watchers' notifications through Firebase Cloud Messaging.
#[derive(Clone)]
pub struct FcmPushDelivery {
    api: FcmApi,
}

impl FcmPushDelivery {
    pub fn new(config: FcmConfig) -> Result<Self, FcmApiError> {
        let api = FcmApi::new(config)?;
        Ok(Self { api })
    }
}

impl PushDelivery for FcmPushDelivery {
    async fn send_to_token(
        &self,
        token: &PushToken,
        notification: &PushNotification,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let message = Notification::new(notification.title.as_str(), notification.body.as_str());
        match self.api.send_to_token(token.as_str(), &message).await {
            Ok(receipt) => Ok(DeliveryReceipt { message_id: receipt.name }),
            Err(FcmApiError::UnregisteredToken(_)) => Err(DeliveryError::UnregisteredToken(token.to_string())),
            Err(e) if e.is_token_error() => {
                Err(DeliveryError::Rejected { token: token.to_string(), reason: e.to_string() })
            },
            // Credentials, quota and outages affect every token alike.
            Err(e) => Err(DeliveryError::Transport(e.to_string())),
        }
    }
}

/// Assigns the order-status and client-location watchers to a fresh set of event handlers.
///
/// Both watchers send through `push`. The handlers do nothing until [`EventHandlers::start_handlers`] is called.
pub fn create_notification_event_handlers<B, P>(
    db: B,
    push: P,
    config: NotifierConfig,
    buffer_size: usize,
) -> EventHandlers
where
    B: NotificationDatabase,
    P: PushDelivery,
{
    debug!("🔔️ Wiring the watchers to the change feed (buffer size {buffer_size})");
    let hooks = watcher_hooks(db, Arc::new(push), config);
    EventHandlers::new(buffer_size, hooks)
}
