//! Integration test common infrastructure.
//!
//! Provides a recording transmit primitive and helpers for asserting on
//! the NOTICE/PRIVMSG lines a client puts on the wire.

pub mod transmit;

#[allow(unused_imports)]
pub use transmit::{Outbound, RecordingTransmit, TestHarness};
