//! SMTP delivery through lettre

use std::sync::Arc;

use async_trait::async_trait;
use event_common::SmtpConfig;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, instrument};

use super::{MailConnector, MailTransport};
use crate::composer::Message;
use crate::error::MailError;

/// Implicit TLS port; anything else upgrades with STARTTLS
const SMTPS_PORT: u16 = 465;

/// Opens [`SmtpMailer`]s against the configured relay
#[derive(Clone)]
pub struct SmtpConnector {
    config: SmtpConfig,
}

impl SmtpConnector {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = if self.config.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.server)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)
        }
        .map_err(|e| MailError::Connect(format!("SMTP relay error: {e}")))?
        .port(self.config.port);

        let builder = if self.config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
        };

        Ok(builder.build())
    }

    fn sender(&self) -> Result<Mailbox, MailError> {
        let address = self
            .config
            .from
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {e}", self.config.from)))?;
        Ok(Mailbox::new(Some(self.config.from_name.clone()), address))
    }
}

#[async_trait]
impl MailConnector for SmtpConnector {
    #[instrument(skip(self), fields(server = %self.config.server, port = self.config.port))]
    async fn connect(&self) -> Result<Arc<dyn MailTransport>, MailError> {
        let mailer = SmtpMailer {
            transport: self.build_transport()?,
            from: self.sender()?,
        };
        mailer.check_connection().await?;
        debug!("SMTP relay reachable");
        Ok(Arc::new(mailer))
    }
}

/// Connected SMTP transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    fn build_email(&self, to: &str, message: &Message) -> Result<lettre::Message, MailError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| MailError::Address(format!("{to}: {e}")))?;

        lettre::Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn check_connection(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Connect("relay did not answer NOOP".to_string())),
            Err(e) => Err(MailError::Connect(e.to_string())),
        }
    }

    #[instrument(skip(self, message), fields(event_id = %message.event_id))]
    async fn send(&self, to: &str, message: &Message) -> Result<(), MailError> {
        let email = self.build_email(to, message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;
        Ok(())
    }
}
