//! Recording transmit primitive for driving a `CtcpClient` in tests.

use async_trait::async_trait;
use slctcp::config::CtcpConfig;
use slctcp::error::TransmitError;
use slctcp::{Connection, CtcpClient, Registry, ReplySchedulers, Transmit};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// One line the client sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Notice { target: String, text: String },
    Privmsg { target: String, text: String },
}

impl Outbound {
    #[allow(dead_code)]
    pub fn text(&self) -> &str {
        match self {
            Self::Notice { text, .. } | Self::Privmsg { text, .. } => text,
        }
    }
}

/// Forwards every outbound line to a channel.
pub struct RecordingTransmit {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl RecordingTransmit {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Transmit for RecordingTransmit {
    async fn notice(&self, target: &str, text: &str) -> Result<(), TransmitError> {
        self.tx
            .send(Outbound::Notice {
                target: target.to_owned(),
                text: text.to_owned(),
            })
            .map_err(|_| TransmitError::Closed)
    }

    async fn privmsg(&self, target: &str, text: &str) -> Result<(), TransmitError> {
        self.tx
            .send(Outbound::Privmsg {
                target: target.to_owned(),
                text: text.to_owned(),
            })
            .map_err(|_| TransmitError::Closed)
    }
}

/// A client wired to a recording transmit.
pub struct TestHarness {
    pub client: CtcpClient,
    pub schedulers: Arc<ReplySchedulers>,
    rx: mpsc::UnboundedReceiver<Outbound>,
}

#[allow(dead_code)]
impl TestHarness {
    /// Client named `me` with the built-in handlers and a fast reply rate.
    pub fn with_builtins() -> Self {
        let config = fast_config();
        let registry = Registry::with_builtins(&config);
        Self::build(&config, |client| client.with_registry(registry))
    }

    /// Client named `me` with whatever registries `attach` adds.
    pub fn build(config: &CtcpConfig, attach: impl FnOnce(CtcpClient) -> CtcpClient) -> Self {
        let (transmit, rx) = RecordingTransmit::new();
        let schedulers = Arc::new(ReplySchedulers::new(config));
        let connection = Connection::new(Arc::new(transmit));
        let client = attach(CtcpClient::new(connection, "me", Arc::clone(&schedulers)));
        Self {
            client,
            schedulers,
            rx,
        }
    }

    /// Next outbound line, or `None` after `wait`.
    pub async fn recv_timeout(&mut self, wait: Duration) -> Option<Outbound> {
        timeout(wait, self.rx.recv()).await.ok().flatten()
    }

    /// Next outbound line within one second. Panics otherwise.
    pub async fn recv(&mut self) -> Outbound {
        self.recv_timeout(Duration::from_secs(1))
            .await
            .expect("expected an outbound line")
    }

    /// Assert nothing is sent for a little while.
    pub async fn assert_silent(&mut self) {
        if let Some(line) = self.recv_timeout(Duration::from_millis(100)).await {
            panic!("unexpected outbound line: {line:?}");
        }
    }
}

/// Default CTCP settings with a 1 ms reply spacing.
#[allow(dead_code)]
pub fn fast_config() -> CtcpConfig {
    CtcpConfig {
        reply_rate: 0.001,
        ..CtcpConfig::default()
    }
}
