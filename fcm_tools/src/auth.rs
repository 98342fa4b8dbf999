use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::*;
use reqwest::Client;
use rsvp_common::Secret;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{config::FcmCredentials, FcmApiError, ServiceAccountKey};

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Google caps self-signed assertions at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens closer than this to expiry are replaced before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Supplies the bearer token for each FCM request.
pub(crate) enum TokenSource {
    Fixed(Secret<String>),
    ServiceAccount(ServiceAccountTokens),
}

impl TokenSource {
    pub fn new(credentials: &FcmCredentials, client: Arc<Client>) -> Result<Self, FcmApiError> {
        match credentials {
            FcmCredentials::AccessToken(token) => Ok(Self::Fixed(token.clone())),
            FcmCredentials::ServiceAccount(key) => {
                let tokens = ServiceAccountTokens::new(key.clone(), client)?;
                Ok(Self::ServiceAccount(tokens))
            },
        }
    }

    pub async fn bearer(&self) -> Result<Secret<String>, FcmApiError> {
        match self {
            Self::Fixed(token) => Ok(token.clone()),
            Self::ServiceAccount(tokens) => tokens.access_token().await,
        }
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: Secret<String>,
    expires_at: DateTime<Utc>,
}

/// Exchanges signed JWT assertions for OAuth2 access tokens and caches the result until shortly before it expires.
pub(crate) struct ServiceAccountTokens {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    client: Arc<Client>,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    pub fn new(key: ServiceAccountKey, client: Arc<Client>) -> Result<Self, FcmApiError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.reveal().as_bytes())
            .map_err(|e| FcmApiError::Initialization(format!("Invalid service account private key. {e}")))?;
        Ok(Self { key, signing_key, client, cached: Mutex::new(None) })
    }

    pub async fn access_token(&self) -> Result<Secret<String>, FcmApiError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(current) = cached.as_ref() {
            if now + Duration::seconds(REFRESH_MARGIN_SECS) < current.expires_at {
                return Ok(current.token.clone());
            }
        }
        let fresh = self.request_token(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn request_token(&self, now: DateTime<Utc>) -> Result<CachedToken, FcmApiError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: FCM_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| FcmApiError::Authentication(format!("Could not sign assertion. {e}")))?;
        debug!("Requesting a fresh FCM access token for {}", self.key.client_email);
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| FcmApiError::Authentication(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FcmApiError::Authentication(format!("Token exchange failed. Error {status}. {text}")));
        }
        let body = response.json::<TokenResponse>().await.map_err(|e| FcmApiError::JsonError(e.to_string()))?;
        let expires_at = now + Duration::seconds(body.expires_in);
        info!("New FCM access token obtained. It expires at {expires_at}");
        Ok(CachedToken { token: Secret::new(body.access_token), expires_at })
    }
}
