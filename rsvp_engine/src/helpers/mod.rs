//! Pure helpers used by the watchers: the status message table, great-circle distances and the reservation lead
//! window.
mod geo;
mod lead_time;
mod messages;

pub use geo::{distance_km, Coordinate, EARTH_RADIUS_KM};
pub use lead_time::{is_within_lead_window, time_until_order};
pub use messages::{status_message, Recipient, NOTIFICATION_BODY, PROXIMITY_MESSAGE};
