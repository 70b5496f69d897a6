//! Reconnectable mail link
//!
//! ```text
//! Disconnected --connect--> Connecting --ok--> Connected
//!                               |                  |
//!                               +--err--> Disconnected <--failed check--+
//! ```
//!
//! A failed health check or a failed reconnect never lets the caller send:
//! the tick that noticed it is skipped and the next one tries again.

use std::sync::Arc;

use tracing::{info, warn};

use super::{MailConnector, MailTransport};

/// Connection state of a [`MailLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the current transport and replaces it when it goes bad
pub struct MailLink {
    connector: Arc<dyn MailConnector>,
    transport: Option<Arc<dyn MailTransport>>,
    state: LinkState,
}

impl MailLink {
    pub fn new(connector: Arc<dyn MailConnector>) -> Self {
        Self {
            connector,
            transport: None,
            state: LinkState::Disconnected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Drop any current transport and open a new one
    pub async fn connect(&mut self) -> bool {
        self.transport = None;
        self.state = LinkState::Connecting;

        match self.connector.connect().await {
            Ok(transport) => {
                self.transport = Some(transport);
                self.state = LinkState::Connected;
                info!("mail relay connected");
                true
            }
            Err(e) => {
                self.state = LinkState::Disconnected;
                warn!(error = %e, "mail relay connection failed");
                false
            }
        }
    }

    /// A transport that just passed a health check, or `None` when this
    /// round must be skipped. A dead or missing connection triggers one
    /// reconnect attempt before returning `None`.
    pub async fn ready_transport(&mut self) -> Option<Arc<dyn MailTransport>> {
        if let Some(transport) = self.transport.clone() {
            match transport.check_connection().await {
                Ok(()) => return Some(transport),
                Err(e) => {
                    warn!(error = %e, "mail relay health check failed");
                    self.transport = None;
                    self.state = LinkState::Disconnected;
                }
            }
        }

        self.connect().await;
        None
    }
}

impl std::fmt::Debug for MailLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailLink")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Message;
    use crate::error::MailError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Probe {
        healthy: Arc<AtomicBool>,
    }

    #[async_trait]
    impl MailTransport for Probe {
        async fn check_connection(&self) -> Result<(), MailError> {
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(MailError::Connect("probe down".into()))
            }
        }

        async fn send(&self, _to: &str, _message: &Message) -> Result<(), MailError> {
            Ok(())
        }
    }

    struct Connector {
        reachable: Arc<AtomicBool>,
        healthy: Arc<AtomicBool>,
        connects: AtomicUsize,
    }

    #[async_trait]
    impl MailConnector for Connector {
        async fn connect(&self) -> Result<Arc<dyn MailTransport>, MailError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.reachable.load(Ordering::SeqCst) {
                Ok(Arc::new(Probe {
                    healthy: Arc::clone(&self.healthy),
                }))
            } else {
                Err(MailError::Connect("unreachable".into()))
            }
        }
    }

    fn connector(reachable: bool) -> Arc<Connector> {
        Arc::new(Connector {
            reachable: Arc::new(AtomicBool::new(reachable)),
            healthy: Arc::new(AtomicBool::new(true)),
            connects: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_connect_transitions() {
        let connector = connector(true);
        let mut link = MailLink::new(connector.clone());
        assert_eq!(link.state(), LinkState::Disconnected);

        assert!(link.connect().await);
        assert_eq!(link.state(), LinkState::Connected);

        connector.reachable.store(false, Ordering::SeqCst);
        assert!(!link.connect().await);
        assert_eq!(link.state(), LinkState::Disconnected);
    }

    #[tokio::test]
    async fn test_healthy_link_is_ready() {
        let connector = connector(true);
        let mut link = MailLink::new(connector.clone());
        link.connect().await;

        assert!(link.ready_transport().await.is_some());
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_check_reconnects_and_skips() {
        let connector = connector(true);
        let mut link = MailLink::new(connector.clone());
        link.connect().await;

        connector.healthy.store(false, Ordering::SeqCst);
        assert!(link.ready_transport().await.is_none());
        // Reconnected right away, but this round stays skipped.
        assert_eq!(link.state(), LinkState::Connected);
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);

        connector.healthy.store(true, Ordering::SeqCst);
        assert!(link.ready_transport().await.is_some());
    }

    #[tokio::test]
    async fn test_disconnected_link_skips_and_retries() {
        let connector = connector(false);
        let mut link = MailLink::new(connector.clone());

        assert!(link.ready_transport().await.is_none());
        assert_eq!(link.state(), LinkState::Disconnected);

        connector.reachable.store(true, Ordering::SeqCst);
        assert!(link.ready_transport().await.is_none());
        assert_eq!(link.state(), LinkState::Connected);
        assert!(link.ready_transport().await.is_some());
    }
}
