//! CTCP client facade for one IRC connection.
//!
//! The transport layer feeds inbound chat text in through
//! [`CtcpClient::on_privmsg`] / [`CtcpClient::on_notice`] (or raw lines
//! through [`CtcpClient::on_line`]); handlers and callers send CTCP
//! through [`CtcpClient::send_ctcp_reply`] and
//! [`CtcpClient::send_ctcp_request`].

use crate::error::TransmitError;
use crate::handlers::{Direction, Registry};
use crate::metrics;
use crate::network::Connection;
use crate::scheduler::{EnqueueOutcome, Recipient, ReplySchedulers};
use crate::telemetry::spans;
use slirc_ctcp::{InboundText, Line, Prefix, build_message, extract};
use std::sync::Arc;
use tracing::{Instrument, debug, trace};

/// CTCP endpoint bound to one connection.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct CtcpClient {
    connection: Connection,
    nick: String,
    schedulers: Arc<ReplySchedulers>,
    registries: Vec<Arc<Registry>>,
}

impl CtcpClient {
    /// Create a client with no handlers attached.
    ///
    /// `nick` is our own nickname; text we sent ourselves is never answered.
    pub fn new(
        connection: Connection,
        nick: impl Into<String>,
        schedulers: Arc<ReplySchedulers>,
    ) -> Self {
        Self {
            connection,
            nick: nick.into(),
            schedulers,
            registries: Vec::new(),
        }
    }

    /// Attach a handler registry. Registries are consulted in attach order.
    pub fn with_registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registries.push(registry.into());
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn registries(&self) -> &[Arc<Registry>] {
        &self.registries
    }

    /// Inbound PRIVMSG: every embedded token is dispatched as a request.
    ///
    /// Senders without a nickname (servers, `!user@host`) cannot be
    /// answered and are skipped.
    pub async fn on_privmsg(&self, sender: &Prefix, target: &str, text: &str) {
        if sender.reply_target().is_none() {
            trace!(sender = %sender, "Ignoring CTCP request from a sender without a nick");
            return;
        }
        self.dispatch_all(Direction::Request, sender, target, text)
            .await;
    }

    /// Inbound NOTICE: every embedded token is dispatched as a reply.
    pub async fn on_notice(&self, sender: &Prefix, target: &str, text: &str) {
        self.dispatch_all(Direction::Response, sender, target, text)
            .await;
    }

    /// Parse one raw IRC line and route it if it is PRIVMSG or NOTICE.
    ///
    /// Unparseable lines are logged and skipped.
    pub async fn on_line(&self, raw: &str) {
        let line = match Line::parse(raw) {
            Ok(line) => line,
            Err(e) => {
                trace!(error = %e, "Skipping unparseable line");
                return;
            }
        };

        match line.inbound() {
            Some(InboundText::Privmsg {
                sender,
                target,
                text,
            }) => self.on_privmsg(&sender, target, text).await,
            Some(InboundText::Notice {
                sender,
                target,
                text,
            }) => self.on_notice(&sender, target, text).await,
            None => {}
        }
    }

    async fn dispatch_all(&self, direction: Direction, sender: &Prefix, target: &str, text: &str) {
        if sender
            .nick()
            .is_some_and(|nick| nick.eq_ignore_ascii_case(&self.nick))
        {
            return;
        }

        for token in extract(text) {
            match direction {
                Direction::Request => metrics::record_request(&token.command),
                Direction::Response => metrics::record_response(&token.command),
            }

            let span = spans::dispatch(&token.command, sender, direction.as_str());
            async {
                for registry in &self.registries {
                    registry
                        .dispatch(self, direction, sender, target, &token)
                        .await;
                }
            }
            .instrument(span)
            .await;
        }
    }

    /// Queue a CTCP reply (sent as NOTICE) through the rate-limited scheduler.
    ///
    /// Never blocks and never fails; a full queue silently drops the reply.
    pub fn send_ctcp_reply<R, I, S>(&self, recipient: &R, command: &str, args: I) -> EnqueueOutcome
    where
        R: Recipient + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schedulers
            .enqueue(&self.connection, recipient, command, args)
    }

    /// Send a CTCP request (as PRIVMSG) immediately, bypassing the reply queue.
    pub async fn send_ctcp_request<R, I, S>(
        &self,
        recipient: &R,
        command: &str,
        args: I,
    ) -> Result<(), TransmitError>
    where
        R: Recipient + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let target = recipient.recipient().ok_or(TransmitError::NoRecipient)?;
        let message = build_message(command, args);
        debug!(recipient = %target, command, "Sending CTCP request");
        self.connection.transmit().privmsg(target, &message).await
    }

    /// Send `/me`-style text as an ACTION request.
    pub async fn send_action(&self, target: &str, text: &str) -> Result<(), TransmitError> {
        self.send_ctcp_request(target, "ACTION", [text]).await
    }
}
