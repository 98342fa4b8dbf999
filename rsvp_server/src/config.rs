use fcm_tools::FcmConfig;
use log::*;
use rsvp_common::{env_flag, env_or_default, env_parse_or_default};
use rsvp_engine::config::NotifierConfig;

const DEFAULT_RSVP_HOST: &str = "127.0.0.1";
const DEFAULT_RSVP_PORT: u16 = 8370;
const DEFAULT_RSVP_DATABASE_URL: &str = "sqlite://data/rsvp_store.db";
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Capacity of each change-event queue. Publishers wait when a queue is full.
    pub event_buffer_size: usize,
    /// If true, the database schema is brought up to date on start-up.
    pub run_migrations: bool,
    pub notifier: NotifierConfig,
    pub fcm: FcmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RSVP_HOST.to_string(),
            port: DEFAULT_RSVP_PORT,
            database_url: DEFAULT_RSVP_DATABASE_URL.to_string(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            run_migrations: true,
            notifier: NotifierConfig::default(),
            fcm: FcmConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env_or_default("RSVP_HOST", DEFAULT_RSVP_HOST);
        let port = env_parse_or_default("RSVP_PORT", DEFAULT_RSVP_PORT);
        let database_url = std::env::var("RSVP_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ RSVP_DATABASE_URL is not set. Using {DEFAULT_RSVP_DATABASE_URL}.");
            DEFAULT_RSVP_DATABASE_URL.to_string()
        });
        let event_buffer_size = match env_parse_or_default("RSVP_EVENT_BUFFER_SIZE", DEFAULT_EVENT_BUFFER_SIZE) {
            0 => {
                error!("🪛️ RSVP_EVENT_BUFFER_SIZE must be at least 1. Using {DEFAULT_EVENT_BUFFER_SIZE}.");
                DEFAULT_EVENT_BUFFER_SIZE
            },
            n => n,
        };
        let run_migrations = env_flag("RSVP_RUN_MIGRATIONS", true);
        let notifier = NotifierConfig::from_env_or_default();
        let fcm = FcmConfig::new_from_env_or_default();
        Self { host, port, database_url, event_buffer_size, run_migrations, notifier, fcm }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8370);
        assert_eq!(config.event_buffer_size, 25);
        assert!(config.run_migrations);
        assert_eq!(config.notifier.proximity_threshold_km, 5.0);
    }

    #[test]
    fn new_overrides_the_address_only() {
        let config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, DEFAULT_RSVP_DATABASE_URL);
    }
}
