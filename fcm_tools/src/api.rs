use std::sync::Arc;

use log::*;
use reqwest::Client;

use crate::{
    auth::TokenSource,
    data_objects::{ErrorResponse, SendRequest},
    FcmApiError,
    FcmConfig,
    Message,
    MessageReceipt,
    Notification,
};

#[derive(Clone)]
pub struct FcmApi {
    config: FcmConfig,
    client: Arc<Client>,
    tokens: Arc<TokenSource>,
}

impl FcmApi {
    pub fn new(config: FcmConfig) -> Result<Self, FcmApiError> {
        let client = Client::builder().build().map_err(|e| FcmApiError::Initialization(e.to_string()))?;
        let client = Arc::new(client);
        let tokens = TokenSource::new(&config.credentials, Arc::clone(&client))?;
        Ok(Self { config, client, tokens: Arc::new(tokens) })
    }

    pub fn url(&self) -> String {
        format!("{}/v1/projects/{}/messages:send", self.config.api_url, self.config.project_id)
    }

    /// Sends `notification` to the single device identified by `token`.
    pub async fn send_to_token(
        &self,
        token: &str,
        notification: &Notification,
    ) -> Result<MessageReceipt, FcmApiError> {
        let message = Message { token: token.to_string(), notification: notification.clone() };
        self.send_message(&message).await
    }

    pub async fn send_message(&self, message: &Message) -> Result<MessageReceipt, FcmApiError> {
        let body = SendRequest { validate_only: self.config.validate_only, message };
        let bearer = self.tokens.bearer().await?;
        trace!("Sending FCM message \"{}\"", message.notification.title);
        let response = self
            .client
            .post(self.url())
            .bearer_auth(bearer.reveal())
            .json(&body)
            .send()
            .await
            .map_err(|e| FcmApiError::RestResponseError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            let receipt =
                response.json::<MessageReceipt>().await.map_err(|e| FcmApiError::JsonError(e.to_string()))?;
            debug!("FCM accepted message {}", receipt.message_id());
            return Ok(receipt);
        }
        let text = response.text().await.map_err(|e| FcmApiError::RestResponseError(e.to_string()))?;
        Err(classify_failure(status.as_u16(), &message.token, text))
    }
}

fn classify_failure(status: u16, token: &str, text: String) -> FcmApiError {
    let parsed = serde_json::from_str::<ErrorResponse>(&text).ok();
    match parsed {
        Some(resp) if status == 404 || resp.error.is_unregistered() => {
            FcmApiError::UnregisteredToken(format!("{token}: {}", resp.error.message))
        },
        Some(resp) => {
            FcmApiError::QueryError { status, message: format!("{} {}", resp.error.status, resp.error.message) }
        },
        None if status == 404 => FcmApiError::UnregisteredToken(token.to_string()),
        None => FcmApiError::QueryError { status, message: text },
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, body_string_contains, header, method, path},
        Mock,
        MockServer,
        ResponseTemplate,
    };

    use super::*;
    use crate::ServiceAccountKey;

    const SEND_PATH: &str = "/v1/projects/demo-project/messages:send";

    fn api_for(server: &MockServer) -> FcmApi {
        let config = FcmConfig::new("demo-project", "test-access-token").with_api_url(&server.uri());
        FcmApi::new(config).expect("Could not create FCM client")
    }

    #[tokio::test]
    async fn send_to_token_posts_title_and_body() {
        let _ = env_logger::try_init();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer test-access-token"))
            .and(body_partial_json(json!({
                "validate_only": false,
                "message": {
                    "token": "device-1",
                    "notification": {"title": "Reservation paid!", "body": "Please check Order(s) for more information"}
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "projects/demo-project/messages/0:1234"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let api = api_for(&server);
        let notification = Notification::new("Reservation paid!", "Please check Order(s) for more information");
        let receipt = api.send_to_token("device-1", &notification).await.expect("send failed");
        assert_eq!(receipt.message_id(), "0:1234");
    }

    #[tokio::test]
    async fn unregistered_tokens_are_reported() {
        let _ = env_logger::try_init();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "Requested entity was not found.",
                    "status": "NOT_FOUND",
                    "details": [{"@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError", "errorCode": "UNREGISTERED"}]
                }
            })))
            .mount(&server)
            .await;
        let api = api_for(&server);
        let err = api.send_to_token("stale", &Notification::new("t", "b")).await.expect_err("should fail");
        assert!(matches!(err, FcmApiError::UnregisteredToken(_)));
        assert!(err.is_token_error());
    }

    #[tokio::test]
    async fn server_errors_keep_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;
        let api = api_for(&server);
        let err = api.send_to_token("device-1", &Notification::new("t", "b")).await.expect_err("should fail");
        match err {
            FcmApiError::QueryError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "try later");
            },
            e => panic!("Unexpected error {e}"),
        }
    }

    fn service_account_for(server: &MockServer) -> FcmApi {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/service_account.json");
        let mut key = ServiceAccountKey::from_file(path).expect("fixture should load");
        key.token_uri = format!("{}/token", server.uri());
        let config = FcmConfig::with_service_account("demo-project", key).with_api_url(&server.uri());
        FcmApi::new(config).expect("Could not create FCM client")
    }

    fn token_response(token: &str, expires_in: i64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"access_token": token, "expires_in": expires_in}))
    }

    fn accepted() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"name": "projects/demo-project/messages/1"}))
    }

    #[tokio::test]
    async fn expiring_access_tokens_are_replaced() {
        let _ = env_logger::try_init();
        let server = MockServer::start().await;
        // Both tokens fall inside the refresh margin, so every send mints a new one.
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(token_response("ya29.first", 30))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("ya29.second", 30))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer ya29.first"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer ya29.second"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;
        let api = service_account_for(&server);
        let notification = Notification::new("Reservation paid!", "b");
        api.send_to_token("device-1", &notification).await.expect("first send failed");
        api.send_to_token("device-1", &notification).await.expect("second send failed");
    }

    #[tokio::test]
    async fn live_access_tokens_are_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("ya29.hour", 3599))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer ya29.hour"))
            .respond_with(accepted())
            .expect(3)
            .mount(&server)
            .await;
        let api = service_account_for(&server);
        for _ in 0..3 {
            api.send_to_token("device-1", &Notification::new("t", "b")).await.expect("send failed");
        }
    }

    #[tokio::test]
    async fn failed_token_exchange_is_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
            .mount(&server)
            .await;
        Mock::given(method("POST")).and(path(SEND_PATH)).respond_with(accepted()).expect(0).mount(&server).await;
        let api = service_account_for(&server);
        let err = api.send_to_token("device-1", &Notification::new("t", "b")).await.expect_err("should fail");
        assert!(matches!(err, FcmApiError::Authentication(ref m) if m.contains("invalid_grant")));
        assert!(!err.is_token_error());
    }

    #[test]
    fn unusable_private_keys_are_rejected_up_front() {
        let key = ServiceAccountKey::from_json(r#"{"client_email": "a@b", "private_key": "not a key"}"#).unwrap();
        let err = FcmApi::new(FcmConfig::with_service_account("p", key)).err().expect("should fail");
        assert!(matches!(err, FcmApiError::Initialization(_)));
    }

    #[test]
    fn url_is_built_from_config() {
        let config = FcmConfig::new("p1", "t").with_api_url("http://localhost:9000/");
        let api = FcmApi::new(config).unwrap();
        assert_eq!(api.url(), "http://localhost:9000/v1/projects/p1/messages:send");
    }
}
