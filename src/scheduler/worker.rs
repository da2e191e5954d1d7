//! Per-connection reply queue and its delivery worker.

use crate::metrics;
use crate::network::{Connection, ConnectionId};
use crate::telemetry::spans;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, warn};

/// One pending reply: where it goes and the CTCP-wrapped text to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyEntry {
    pub recipient: String,
    pub message: String,
}

/// What happened to an enqueue attempt.
///
/// Callers are free to ignore this; a dropped reply is accepted behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Accepted; the worker will send it in FIFO order.
    Queued,
    /// The queue was full and the new reply was discarded.
    Dropped,
    /// The worker has stopped; nothing will be sent on this scheduler.
    Closed,
    /// The recipient resolved to no nickname; nothing was queued.
    Unaddressed,
}

/// Bounded FIFO of replies for one connection, drained by a single worker.
///
/// The worker sends one entry, then sleeps for the configured interval
/// before taking the next, so consecutive replies on a connection are
/// always at least that far apart. Dropping the scheduler stops the worker.
#[derive(Debug)]
pub struct ReplyScheduler {
    connection: ConnectionId,
    tx: mpsc::Sender<ReplyEntry>,
    cancel: CancellationToken,
    capacity: usize,
}

impl ReplyScheduler {
    /// Create the queue and start its worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub(crate) fn spawn(connection: &Connection, capacity: usize, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let cancel = CancellationToken::new();

        let id = connection.id();
        tokio::spawn(
            deliver(connection.clone(), rx, interval, cancel.clone())
                .instrument(spans::connection(id.get())),
        );
        metrics::adjust_schedulers(1);
        debug!(connection = %id, capacity, ?interval, "Reply scheduler started");

        Self {
            connection: id,
            tx,
            cancel,
            capacity,
        }
    }

    /// Push an entry without blocking. A full queue drops the new entry.
    pub fn try_enqueue(&self, entry: ReplyEntry) -> EnqueueOutcome {
        match self.tx.try_send(entry) {
            Ok(()) => {
                metrics::record_reply_queued();
                EnqueueOutcome::Queued
            }
            Err(TrySendError::Full(entry)) => {
                metrics::record_reply_dropped();
                debug!(
                    connection = %self.connection,
                    recipient = %entry.recipient,
                    "Reply queue full, dropping reply"
                );
                EnqueueOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => EnqueueOutcome::Closed,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Maximum number of entries the queue holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries waiting to be sent (the one in flight is not counted).
    pub fn pending(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    /// Ask the worker to stop at its next wait point. Queued entries are discarded.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// `true` once the worker has exited.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Delivery loop: pop one entry, send it as a NOTICE, wait, repeat.
async fn deliver(
    connection: Connection,
    mut rx: mpsc::Receiver<ReplyEntry>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        let entry = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            entry = rx.recv() => match entry {
                Some(entry) => entry,
                None => break,
            },
        };

        match connection
            .transmit()
            .notice(&entry.recipient, &entry.message)
            .await
        {
            Ok(()) => {
                metrics::record_reply_sent();
                debug!(recipient = %entry.recipient, "Sent CTCP reply");
            }
            Err(e) => {
                metrics::record_transmit_error(e.error_code());
                warn!(recipient = %entry.recipient, error = %e, "Failed to send CTCP reply");
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    rx.close();
    metrics::adjust_schedulers(-1);
    debug!(connection = %connection.id(), "Reply scheduler stopped");
}
