use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use email_address::EmailAddress;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

/// MailerSend API client for sending transactional emails
pub struct MailerSendClient {
    client: reqwest::Client,
    base_url: String,
}

/// An email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mailbox {
    pub email: String,
    pub name: Option<String>,
}

/// Request payload for sending an email via MailerSend
#[derive(Debug, Serialize)]
pub struct SendEmailRequest {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailResponse {
    pub message_id: Option<String>,
}

impl MailerSendClient {
    /// Fails with a config error when no API key is set.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = build_client(config)?;
        let base_url = config.mailersend_base_url().trim_end_matches('/').to_owned();

        Ok(Self { client, base_url })
    }

    pub async fn send_email(&self, request: SendEmailRequest) -> Result<SendEmailResponse, Error> {
        for mailbox in std::iter::once(&request.from).chain(&request.to) {
            if !is_valid_email(&mailbox.email) {
                warn!("Refusing to send email with invalid address {}", mailbox.email);
                return Err(Error {
                    source: None,
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(format!(
                        "Invalid email address: {}",
                        mailbox.email
                    ))),
                });
            }
        }

        let url = format!("{}/email", self.base_url);
        debug!("Sending \"{}\" to {} recipients", request.subject, request.to.len());

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if status.is_success() {
            let message_id = response
                .headers()
                .get("x-message-id")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            info!("Email sent, message_id: {message_id:?}");
            Ok(SendEmailResponse { message_id })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("MailerSend refused email: {status} - {error_text}");
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                    "MailerSend responded with {status}"
                ))),
            })
        }
    }
}

fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let api_key = config.mailersend_api_key().ok_or_else(|| {
        warn!("MailerSend API key is not configured");
        Error::config()
    })?;

    let mut auth_header = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|err| Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Failed to create authorization header value".to_string(),
            )),
        })?;
    auth_header.set_sensitive(true);

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(reqwest::header::AUTHORIZATION, auth_header);
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?)
}

pub fn is_valid_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mockito::Server;

    fn request(to: &str) -> SendEmailRequest {
        SendEmailRequest {
            from: Mailbox {
                email: "noreply@phaunos.local".to_string(),
                name: Some("Phaunos".to_string()),
            },
            to: vec![Mailbox {
                email: to.to_string(),
                name: None,
            }],
            subject: "Hello".to_string(),
            text: "Body".to_string(),
            html: None,
        }
    }

    #[test]
    fn client_creation_fails_without_api_key() {
        let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_mailersend("http://localhost", None);

        assert!(MailerSendClient::new(&config).is_err());
    }

    #[test]
    fn html_is_left_out_of_the_payload_when_absent() {
        let json = serde_json::to_value(request("a@b.org")).unwrap();

        assert_eq!(json["to"][0]["email"], "a@b.org");
        assert!(json.get("html").is_none());
    }

    #[test]
    fn email_validation() {
        for email in ["", "invalid-email", "@example.com", "test@"] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
        assert!(is_valid_email("user.name@domain.co.uk"));
    }

    #[tokio::test]
    async fn sends_with_bearer_auth_and_reads_the_message_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/email")
            .match_header("authorization", "Bearer key_123")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "subject": "Hello",
                "to": [{"email": "a@b.org", "name": null}]
            })))
            .with_status(202)
            .with_header("x-message-id", "msg_1")
            .create_async()
            .await;
        let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_mailersend(&server.url(), Some("key_123"));

        let response = MailerSendClient::new(&config)
            .unwrap()
            .send_email(request("a@b.org"))
            .await
            .unwrap();

        assert_eq!(response.message_id.as_deref(), Some("msg_1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn a_refused_request_is_an_external_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/email")
            .with_status(422)
            .with_body(r#"{"message":"invalid"}"#)
            .create_async()
            .await;
        let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_mailersend(&server.url(), Some("key_123"));

        let err = MailerSendClient::new(&config)
            .unwrap()
            .send_email(request("a@b.org"))
            .await
            .unwrap_err();

        assert!(matches!(err.error_kind, DomainErrorKind::External(_)));
    }

    #[tokio::test]
    async fn invalid_recipients_are_refused_before_any_request() {
        let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_mailersend("http://127.0.0.1:9", Some("k"));

        let err = MailerSendClient::new(&config)
            .unwrap()
            .send_email(request("not-an-email"))
            .await
            .unwrap_err();

        assert!(matches!(err.error_kind, DomainErrorKind::Internal(_)));
    }
}
