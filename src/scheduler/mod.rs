//! Rate-limited CTCP reply delivery.
//!
//! Answering every CTCP request immediately lets anyone make us flood
//! ourselves off the server. Replies therefore go through a bounded queue
//! per connection, drained by one worker that waits `reply_rate` between
//! sends. When the queue is full new replies are dropped.
//!
//! # Architecture
//!
//! [`ReplySchedulers`] maps each [`ConnectionId`] to its [`ReplyScheduler`].
//! The first enqueue for a connection creates the scheduler and spawns its
//! worker inside a `DashMap` entry lock, so concurrent first use still
//! yields exactly one worker. Schedulers live until [`ReplySchedulers::remove`]
//! or [`ReplySchedulers::shutdown`] is called, or the registry is dropped.

mod worker;

pub use worker::{EnqueueOutcome, ReplyEntry, ReplyScheduler};

use crate::config::CtcpConfig;
use crate::network::{Connection, ConnectionId};
use dashmap::DashMap;
use slirc_ctcp::{Prefix, build_message};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Anything a reply can be addressed to.
///
/// Plain strings are used as-is; a sender [`Prefix`] resolves to its
/// nickname. `None` means there is nobody to address.
pub trait Recipient {
    fn recipient(&self) -> Option<&str>;
}

impl Recipient for str {
    fn recipient(&self) -> Option<&str> {
        Some(self).filter(|s| !s.is_empty())
    }
}

impl Recipient for String {
    fn recipient(&self) -> Option<&str> {
        self.as_str().recipient()
    }
}

impl Recipient for Prefix {
    fn recipient(&self) -> Option<&str> {
        self.reply_target()
    }
}

/// Process-wide registry of per-connection reply schedulers.
#[derive(Debug)]
pub struct ReplySchedulers {
    schedulers: DashMap<ConnectionId, Arc<ReplyScheduler>>,
    queue_size: usize,
    interval: Duration,
    started: AtomicU64,
}

impl ReplySchedulers {
    /// Create an empty registry. Configuration is fixed from here on.
    pub fn new(config: &CtcpConfig) -> Self {
        Self {
            schedulers: DashMap::new(),
            queue_size: config.reply_queue_size,
            interval: config.reply_interval(),
            started: AtomicU64::new(0),
        }
    }

    /// Return the scheduler for `connection`, starting one on first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn get_or_create(&self, connection: &Connection) -> Arc<ReplyScheduler> {
        Arc::clone(
            self.schedulers
                .entry(connection.id())
                .or_insert_with(|| {
                    self.started.fetch_add(1, Ordering::Relaxed);
                    Arc::new(ReplyScheduler::spawn(
                        connection,
                        self.queue_size,
                        self.interval,
                    ))
                })
                .value(),
        )
    }

    /// Existing scheduler for `id`, if any.
    pub fn get(&self, id: ConnectionId) -> Option<Arc<ReplyScheduler>> {
        self.schedulers.get(&id).map(|s| Arc::clone(s.value()))
    }

    /// Build a CTCP reply and queue it for delivery as a NOTICE.
    ///
    /// Never blocks and never fails; see [`EnqueueOutcome`] for what happened.
    pub fn enqueue<R, I, S>(
        &self,
        connection: &Connection,
        recipient: &R,
        command: &str,
        args: I,
    ) -> EnqueueOutcome
    where
        R: Recipient + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(recipient) = recipient.recipient() else {
            debug!(connection = %connection.id(), command, "Reply has no recipient, discarded");
            return EnqueueOutcome::Unaddressed;
        };
        let entry = ReplyEntry {
            recipient: recipient.to_owned(),
            message: build_message(command, args),
        };
        let outcome = self.get_or_create(connection).try_enqueue(entry);
        if outcome == EnqueueOutcome::Closed {
            debug!(connection = %connection.id(), command, "Reply scheduler closed, reply discarded");
        }
        outcome
    }

    /// Stop and forget the scheduler for `id`. Returns `false` if there was none.
    pub fn remove(&self, id: ConnectionId) -> bool {
        match self.schedulers.remove(&id) {
            Some((_, scheduler)) => {
                scheduler.stop();
                true
            }
            None => false,
        }
    }

    /// Stop every worker and clear the registry.
    pub fn shutdown(&self) {
        for entry in self.schedulers.iter() {
            entry.value().stop();
        }
        self.schedulers.clear();
    }

    /// Replies waiting across every connection.
    pub fn pending(&self) -> usize {
        self.schedulers.iter().map(|s| s.value().pending()).sum()
    }

    /// The configured minimum spacing between replies.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delivery workers started over this registry's lifetime.
    pub fn workers_started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    /// Number of live schedulers.
    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }
}
