//! Mail delivery

mod link;
mod smtp;

pub use link::{LinkState, MailLink};
pub use smtp::{SmtpConnector, SmtpMailer};

use std::sync::Arc;

use async_trait::async_trait;

use crate::composer::Message;
use crate::error::MailError;

/// An open connection to a mail relay
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Probe the relay without sending anything
    async fn check_connection(&self) -> Result<(), MailError>;

    /// Deliver one message to one address
    async fn send(&self, to: &str, message: &Message) -> Result<(), MailError>;
}

/// Opens transports; used by [`MailLink`] to (re)connect
#[async_trait]
pub trait MailConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn MailTransport>, MailError>;
}
