//! CTCP handler dispatch.
//!
//! Decoded tokens are routed by uppercase command name to handlers
//! registered explicitly on a [`Registry`]. Requests (from PRIVMSG) and
//! replies (from NOTICE) use separate tables: a reply must never be
//! answered, so the two can never be confused.

mod builtin;
mod context;
mod registry;

pub use builtin::{ClientInfoHandler, PingHandler, SourceHandler, TimeHandler, VersionHandler};
pub use context::{Context, CtcpHandler, Direction};
pub use registry::{Registry, RegistryId};
