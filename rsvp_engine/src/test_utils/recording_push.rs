use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
};

use crate::{
    db_types::PushToken,
    notifier::{DeliveryError, DeliveryReceipt, PushDelivery, PushNotification},
};

/// A [`PushDelivery`] that records every accepted notification instead of sending it.
///
/// Tokens marked with [`Self::reject_token`] fail with [`DeliveryError::Rejected`] and are not recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingPushDelivery {
    sent: Arc<Mutex<Vec<(PushToken, PushNotification)>>>,
    rejected: HashSet<PushToken>,
    counter: Arc<AtomicUsize>,
}

impl RecordingPushDelivery {
    pub fn reject_token(mut self, token: &str) -> Self {
        self.rejected.insert(PushToken::from(token));
        self
    }

    pub fn sent(&self) -> Vec<(PushToken, PushNotification)> {
        self.sent.lock().expect("poisoned lock").clone()
    }

    pub fn sent_to(&self, token: &PushToken) -> Vec<PushNotification> {
        self.sent().into_iter().filter(|(t, _)| t == token).map(|(_, n)| n).collect()
    }
}

impl PushDelivery for RecordingPushDelivery {
    async fn send_to_token(
        &self,
        token: &PushToken,
        notification: &PushNotification,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        if self.rejected.contains(token) {
            return Err(DeliveryError::Rejected { token: token.to_string(), reason: "Rejected by test".into() });
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().expect("poisoned lock").push((token.clone(), notification.clone()));
        Ok(DeliveryReceipt { message_id: format!("projects/test/messages/{n}") })
    }
}
