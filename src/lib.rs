//! slctcp - Straylight CTCP responder
//!
//! Client-to-Client Protocol support for IRC clients: decodes CTCP tokens
//! embedded in chat text, dispatches them to explicitly registered
//! handlers, and delivers replies through a per-connection, rate-limited,
//! bounded queue so that answering requests can never flood us off a
//! server.
//!
//! The wire codec lives in the `slirc-ctcp` crate; this crate adds the
//! moving parts around it.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod scheduler;
pub mod telemetry;

pub use client::CtcpClient;
pub use handlers::{Context, CtcpHandler, Direction, Registry};
pub use network::{Connection, ConnectionId, Transmit};
pub use scheduler::{EnqueueOutcome, Recipient, ReplyEntry, ReplyScheduler, ReplySchedulers};
