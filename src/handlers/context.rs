//! Handler context and trait.

use super::registry::Registry;
use crate::client::CtcpClient;
use crate::error::HandlerResult;
use async_trait::async_trait;
use slirc_ctcp::Prefix;
use std::fmt;

/// Whether a token arrived as a request or as a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Carried by PRIVMSG; may be answered.
    Request,
    /// Carried by NOTICE; must not be answered.
    Response,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a handler gets to see about one decoded token.
pub struct Context<'a> {
    /// Command name as received (case preserved).
    pub command: &'a str,
    /// The client the token arrived on; replies go through it.
    pub client: &'a CtcpClient,
    /// The registry that is dispatching this token.
    pub registry: &'a Registry,
    /// Who sent it.
    pub sender: &'a Prefix,
    /// Channel or nickname the carrying message was addressed to.
    pub target: &'a str,
    pub direction: Direction,
}

/// A CTCP command handler.
#[async_trait]
pub trait CtcpHandler: Send + Sync {
    /// Handle one decoded token. Errors are logged by the dispatcher and
    /// never reach the transport.
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult;
}
