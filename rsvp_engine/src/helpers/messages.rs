use crate::db_types::OrderStatusType;

/// The body attached to every status notification. The title carries the actual message.
pub const NOTIFICATION_BODY: &str = "Please check Order(s) for more information";

/// Sent to a merchant when a client with an active reservation gets close.
pub const PROXIMITY_MESSAGE: &str = "Your customer is approaching!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Client,
    Merchant,
}

/// The human-readable message for `status`, worded for `recipient`.
///
/// Statuses outside the known set are echoed back unchanged.
pub fn status_message(status: &OrderStatusType, recipient: Recipient) -> String {
    use OrderStatusType::*;
    use Recipient::*;
    let msg = match (status, recipient) {
        (WaitingMerchantConfirmation, Client) => "Reservation request sent!",
        (WaitingMerchantConfirmation, Merchant) => "We have a new customer!",
        (WaitingPayment, Client) => "Reservation accepted, please pay to proceed",
        (WaitingPayment, Merchant) => "Reservation confirmed, waiting for payment",
        (OnProgress, _) => "Reservation paid!",
        (Cancelled, _) => "Reservation cancelled",
        (Done, _) => "Reservation Done, Thank You!",
        (Unrecognized(raw), _) => raw.as_str(),
    };
    msg.to_string()
}
