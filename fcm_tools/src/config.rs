use std::path::Path;

use log::*;
use rsvp_common::{env_flag, Secret};
use serde::Deserialize;

use crate::FcmApiError;

pub const DEFAULT_FCM_API_URL: &str = "https://fcm.googleapis.com";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a Google service-account key file that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    #[serde(deserialize_with = "secret_string")]
    pub private_key: Secret<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn secret_string<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Secret<String>, D::Error> {
    String::deserialize(d).map(Secret::new)
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, FcmApiError> {
        serde_json::from_str(json).map_err(|e| FcmApiError::Initialization(format!("Invalid service account key. {e}")))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FcmApiError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FcmApiError::Initialization(format!("Could not read {}. {e}", path.display())))?;
        Self::from_json(&json)
    }
}

/// How the client authenticates against FCM.
#[derive(Debug, Clone)]
pub enum FcmCredentials {
    /// A pre-minted OAuth2 access token. Google expires these after about an hour and nothing renews them.
    AccessToken(Secret<String>),
    /// Access tokens are minted from the key on demand and refreshed shortly before they expire.
    ServiceAccount(ServiceAccountKey),
}

impl Default for FcmCredentials {
    fn default() -> Self {
        Self::AccessToken(Secret::default())
    }
}

impl FcmCredentials {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::AccessToken(token) if token.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FcmConfig {
    /// The Firebase project that owns the device registrations.
    pub project_id: String,
    pub credentials: FcmCredentials,
    /// Base URL of the messaging service. Only ever changed for testing.
    pub api_url: String,
    /// When true, FCM validates each message without delivering it.
    pub validate_only: bool,
}

impl FcmConfig {
    pub fn new(project_id: &str, access_token: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            credentials: FcmCredentials::AccessToken(Secret::new(access_token.to_string())),
            api_url: DEFAULT_FCM_API_URL.to_string(),
            validate_only: false,
        }
    }

    pub fn with_service_account(project_id: &str, key: ServiceAccountKey) -> Self {
        Self {
            project_id: project_id.to_string(),
            credentials: FcmCredentials::ServiceAccount(key),
            api_url: DEFAULT_FCM_API_URL.to_string(),
            validate_only: false,
        }
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Reads the FCM settings from the environment.
    ///
    /// A service-account key (`RSVP_FCM_SERVICE_ACCOUNT`, else `GOOGLE_APPLICATION_CREDENTIALS`) takes precedence over
    /// a fixed `RSVP_FCM_ACCESS_TOKEN`. The project id falls back to the one in the key file.
    pub fn new_from_env_or_default() -> Self {
        let key = service_account_from_env();
        let project_id =
            std::env::var("RSVP_FCM_PROJECT_ID").ok().or_else(|| key.as_ref().and_then(|k| k.project_id.clone()));
        let project_id = project_id.unwrap_or_else(|| {
            warn!("🪛️ RSVP_FCM_PROJECT_ID not set, using (probably useless) default");
            "example-project".to_string()
        });
        let credentials = match key {
            Some(key) => {
                info!("🪛️ FCM access tokens will be minted for {}", key.client_email);
                FcmCredentials::ServiceAccount(key)
            },
            None => match std::env::var("RSVP_FCM_ACCESS_TOKEN") {
                Ok(token) => {
                    warn!(
                        "🪛️ Using the fixed RSVP_FCM_ACCESS_TOKEN. It is never refreshed, so push delivery stops \
                         once it expires. Configure RSVP_FCM_SERVICE_ACCOUNT instead."
                    );
                    FcmCredentials::AccessToken(Secret::new(token))
                },
                Err(_) => {
                    warn!("🪛️ No FCM credentials are configured. Every push notification will be rejected.");
                    FcmCredentials::default()
                },
            },
        };
        let api_url = std::env::var("RSVP_FCM_API_URL").unwrap_or_else(|_| {
            debug!("🪛️ RSVP_FCM_API_URL not set, using {DEFAULT_FCM_API_URL}");
            DEFAULT_FCM_API_URL.to_string()
        });
        let validate_only = env_flag("RSVP_FCM_VALIDATE_ONLY", false);
        if validate_only {
            warn!("🪛️ RSVP_FCM_VALIDATE_ONLY is set. Push notifications will be validated but NOT delivered.");
        }
        Self { project_id, credentials, api_url: api_url.trim_end_matches('/').to_string(), validate_only }
    }
}

fn service_account_from_env() -> Option<ServiceAccountKey> {
    let path =
        std::env::var("RSVP_FCM_SERVICE_ACCOUNT").or_else(|_| std::env::var("GOOGLE_APPLICATION_CREDENTIALS")).ok()?;
    match ServiceAccountKey::from_file(&path) {
        Ok(key) => Some(key),
        Err(e) => {
            error!("🪛️ Ignoring the FCM service account at {path}. {e}");
            None
        },
    }
}
