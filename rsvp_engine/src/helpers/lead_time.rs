use chrono::{DateTime, Duration, Utc};
use log::*;

use crate::{config::NotifierConfig, db_types::Order};

/// How long until the reservation starts.
///
/// The stored reservation time is shifted back by `order_time_offset` first. That shift is the only correction: both
/// sides are instants, so the reference zone does not change the result and only decides how the two times are
/// rendered in the log. The result is negative for reservations whose time has already passed.
pub fn time_until_order(order_date: DateTime<Utc>, now: DateTime<Utc>, config: &NotifierConfig) -> Duration {
    let zone = config.reference_zone.offset();
    let scheduled = order_date.with_timezone(&zone) - config.order_time_offset;
    let now = now.with_timezone(&zone);
    trace!("📍️ Reservation time {scheduled} vs now {now} ({})", config.reference_zone.name());
    scheduled - now
}

/// True when less than the lead window remains before `order` starts. Past-due reservations count as within the
/// window.
pub fn is_within_lead_window(order: &Order, now: DateTime<Utc>, config: &NotifierConfig) -> bool {
    time_until_order(order.order_date, now, config) < config.lead_window
}
