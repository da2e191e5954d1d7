//! Connection handle and transmit primitive.
//!
//! The transport layer owns the socket; the CTCP core only ever sees a
//! [`Connection`]: a stable identity plus a way to put a line on the wire.

use crate::error::TransmitError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of one IRC connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

impl ConnectionId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ConnectionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Outbound half of a connection, supplied by the transport layer.
#[async_trait]
pub trait Transmit: Send + Sync {
    /// Send `NOTICE target :text`. Used only by reply delivery workers.
    async fn notice(&self, target: &str, text: &str) -> Result<(), TransmitError>;

    /// Send `PRIVMSG target :text`. Used for outgoing requests.
    async fn privmsg(&self, target: &str, text: &str) -> Result<(), TransmitError>;
}

/// A connection handle: identity plus transmit primitive.
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    transmit: Arc<dyn Transmit>,
}

impl Connection {
    /// Wrap a transmit primitive under a fresh id.
    pub fn new(transmit: Arc<dyn Transmit>) -> Self {
        Self::with_id(ConnectionId::next(), transmit)
    }

    /// Wrap a transmit primitive under a caller-chosen id.
    pub fn with_id(id: ConnectionId, transmit: Arc<dyn Transmit>) -> Self {
        Self { id, transmit }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn transmit(&self) -> &Arc<dyn Transmit> {
        &self.transmit
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish_non_exhaustive()
    }
}
