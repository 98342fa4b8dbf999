//! Tunables for the proximity check.
//!
//! [`NotifierConfig`] is built once at start-up and handed to the watchers. Nothing in the engine reads these values
//! from the environment on its own.
use std::{fmt::Display, str::FromStr};

use chrono::{Duration, FixedOffset, Offset, Utc};
use log::*;
use rsvp_common::{env_or_default, env_parse_or_default};
use thiserror::Error;

pub const DEFAULT_LEAD_WINDOW_MINUTES: i64 = 60;
pub const DEFAULT_PROXIMITY_THRESHOLD_KM: f64 = 5.0;
pub const DEFAULT_REFERENCE_ZONE: &str = "Asia/Makassar";
pub const DEFAULT_ORDER_TIME_OFFSET_HOURS: i64 = 8;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Unknown time zone '{0}'. Use one of the supported zone names or an offset such as +08:00")]
    UnknownTimeZone(String),
}

//-------------------------------------------------  ReferenceZone  ---------------------------------------------------
/// The time zone that reservation times and "now" are rendered in when the proximity check logs its decision.
///
/// Whether a reservation is close is decided on instants, so the zone never changes that outcome.
///
/// Only fixed-offset zones are supported. That covers every Indonesian zone (none of which observe daylight saving),
/// and anything else can be given as an explicit `±HH:MM` offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceZone {
    name: String,
    offset: FixedOffset,
}

const KNOWN_ZONES: [(&str, i32); 8] = [
    ("UTC", 0),
    ("Etc/UTC", 0),
    ("Asia/Jakarta", 7),
    ("Asia/Pontianak", 7),
    ("Asia/Makassar", 8),
    ("Asia/Jayapura", 9),
    ("Asia/Singapore", 8),
    ("Asia/Kuala_Lumpur", 8),
];

impl ReferenceZone {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self { name: DEFAULT_REFERENCE_ZONE.to_string(), offset: hours_east(8) }
    }
}

impl Display for ReferenceZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.offset)
    }
}

impl FromStr for ReferenceZone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((name, hours)) = KNOWN_ZONES.iter().find(|(name, _)| name.eq_ignore_ascii_case(s)) {
            return Ok(Self { name: name.to_string(), offset: hours_east(*hours) });
        }
        parse_offset(s)
            .map(|offset| Self { name: s.to_string(), offset })
            .ok_or_else(|| ConfigError::UnknownTimeZone(s.to_string()))
    }
}

fn hours_east(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Parses `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits = rest.replace(':', "");
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hh, mm) = digits.split_at(digits.len().min(2));
    let hours = hh.parse::<i32>().ok()?;
    let minutes = if mm.is_empty() { 0 } else { mm.parse::<i32>().ok()? };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

//-------------------------------------------------  NotifierConfig  --------------------------------------------------
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// A reservation is "coming up" once less than this much time remains before it.
    pub lead_window: Duration,
    /// Merchants are told a customer is approaching once the customer is closer than this.
    pub proximity_threshold_km: f64,
    pub reference_zone: ReferenceZone,
    /// Subtracted from the stored reservation time before comparing it with the current time.
    pub order_time_offset: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            lead_window: Duration::minutes(DEFAULT_LEAD_WINDOW_MINUTES),
            proximity_threshold_km: DEFAULT_PROXIMITY_THRESHOLD_KM,
            reference_zone: ReferenceZone::default(),
            order_time_offset: Duration::hours(DEFAULT_ORDER_TIME_OFFSET_HOURS),
        }
    }
}

impl NotifierConfig {
    pub fn from_env_or_default() -> Self {
        let lead_window = env_parse_or_default("RSVP_LEAD_WINDOW_MINUTES", DEFAULT_LEAD_WINDOW_MINUTES);
        let proximity_threshold_km =
            env_parse_or_default("RSVP_PROXIMITY_THRESHOLD_KM", DEFAULT_PROXIMITY_THRESHOLD_KM);
        let order_time_offset = env_parse_or_default("RSVP_ORDER_TIME_OFFSET_HOURS", DEFAULT_ORDER_TIME_OFFSET_HOURS);
        let zone = env_or_default("RSVP_REFERENCE_ZONE", DEFAULT_REFERENCE_ZONE);
        let reference_zone = zone.parse::<ReferenceZone>().unwrap_or_else(|e| {
            warn!("🪛️ {e}. Falling back to {DEFAULT_REFERENCE_ZONE}.");
            ReferenceZone::default()
        });
        let config = Self {
            lead_window: Duration::minutes(lead_window),
            proximity_threshold_km,
            reference_zone,
            order_time_offset: Duration::hours(order_time_offset),
        };
        info!(
            "🪛️ Proximity notices fire within {} min of a reservation and {} km of the merchant. Reference zone: {}",
            config.lead_window.num_minutes(),
            config.proximity_threshold_km,
            config.reference_zone
        );
        config
    }

    pub fn with_lead_window(mut self, lead_window: Duration) -> Self {
        self.lead_window = lead_window;
        self
    }

    pub fn with_proximity_threshold_km(mut self, km: f64) -> Self {
        self.proximity_threshold_km = km;
        self
    }
}
