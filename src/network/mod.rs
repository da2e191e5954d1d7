//! Network module.
//!
//! Contains the connection handle the CTCP core talks to and the
//! line-writer transmit primitive used by the stdio driver.

mod line_writer;
mod transmit;

pub use line_writer::LineWriter;
pub use transmit::{Connection, ConnectionId, Transmit};
