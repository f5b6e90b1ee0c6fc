use crate::{
    error::Error,
    gateway::mailersend::{MailerSendClient, Mailbox, SendEmailRequest},
};

use log::*;
use service::config::Config;

/// The link a user follows to confirm their email address.
pub fn confirmation_link(config: &Config, token: &str) -> String {
    format!("{}/api/user/confirm/{token}", config.public_base_url())
}

/// Mails the confirmation link to `email`.
///
/// Without a MailerSend API key the link is only logged, which is how development setups
/// confirm accounts.
pub async fn send_confirmation_email(config: &Config, email: &str, token: &str) -> Result<(), Error> {
    let link = confirmation_link(config, token);

    if config.mailersend_api_key().is_none() {
        info!("MailerSend is not configured, confirmation link for {email}: {link}");
        return Ok(());
    }

    let request = SendEmailRequest {
        from: Mailbox {
            email: config.mail_sender().to_owned(),
            name: Some("Phaunos".to_owned()),
        },
        to: vec![Mailbox {
            email: email.to_owned(),
            name: None,
        }],
        subject: "Please confirm your email".to_owned(),
        text: format!("Welcome to Phaunos! Please follow this link to activate your account:\n{link}\n"),
        html: Some(format!(
            "<p>Welcome to Phaunos! Please follow this link to activate your account:</p>\
             <p><a href=\"{link}\">{link}</a></p>"
        )),
    };

    MailerSendClient::new(config)?.send_email(request).await?;
    info!("Confirmation email sent to {email}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mockito::Server;

    #[test]
    fn links_point_at_the_confirm_route() {
        let config = Config::parse_from([
            "phaunos",
            "--jwt-secret-key",
            "test-secret",
            "--public-base-url",
            "https://phaunos.org/",
        ]);

        assert_eq!(
            confirmation_link(&config, "abc"),
            "https://phaunos.org/api/user/confirm/abc"
        );
    }

    #[tokio::test]
    async fn without_api_key_the_link_is_only_logged() {
        let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_mailersend("http://127.0.0.1:9", None);

        assert!(send_confirmation_email(&config, "a@b.org", "tok").await.is_ok());
    }

    #[tokio::test]
    async fn the_link_is_mailed_when_mailersend_is_configured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/email")
            .match_body(mockito::Matcher::Regex("api/user/confirm/tok".to_string()))
            .with_status(202)
            .create_async()
            .await;
        let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"])
            .set_mailersend(&server.url(), Some("key"));

        send_confirmation_email(&config, "a@b.org", "tok").await.unwrap();

        mock.assert_async().await;
    }
}
