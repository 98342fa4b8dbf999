use futures_util::future::join_all;
use log::*;

use crate::{
    db_types::PushToken,
    helpers::NOTIFICATION_BODY,
    notifier::{DeliveryError, DeliveryReceipt, PushDelivery, PushNotification},
};

/// The outcome of sending one message to a set of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub failures: Vec<(PushToken, DeliveryError)>,
}

impl FanOutReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn merge(mut self, other: FanOutReport) -> Self {
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
        self
    }
}

/// Sends `message` as the title of a notification to a single device. The body is always [`NOTIFICATION_BODY`].
pub async fn send_notification<P: PushDelivery>(
    push: &P,
    token: &PushToken,
    message: &str,
) -> Result<DeliveryReceipt, DeliveryError> {
    let notification = PushNotification::new(message, NOTIFICATION_BODY);
    push.send_to_token(token, &notification).await
}

/// Sends `message` to every token concurrently and waits for all of the sends to complete.
///
/// A failed send is logged and recorded in the report. It never affects the other sends, and nothing is retried.
pub async fn fan_out<P: PushDelivery>(push: &P, tokens: &[PushToken], message: &str) -> FanOutReport {
    let mut sends = Vec::with_capacity(tokens.len());
    for token in tokens {
        sends.push(send_tagged(push, token.clone(), message));
    }
    let results = join_all(sends).await;
    let mut report = FanOutReport::default();
    for (token, result) in results {
        match result {
            Ok(receipt) => {
                trace!("📨️ \"{message}\" delivered to {token} ({})", receipt.message_id);
                report.delivered += 1;
            },
            Err(e) => {
                warn!("📨️ Could not deliver \"{message}\". {e}");
                report.failures.push((token, e));
            },
        }
    }
    debug!("📨️ \"{message}\" sent to {} of {} devices", report.delivered, tokens.len());
    report
}

async fn send_tagged<P: PushDelivery>(
    push: &P,
    token: PushToken,
    message: &str,
) -> (PushToken, Result<DeliveryReceipt, DeliveryError>) {
    let result = send_notification(push, &token, message).await;
    (token, result)
}
