//! # slirc-ctcp
//!
//! CTCP (Client-to-Client Protocol) codec for IRC clients.
//!
//! CTCP embeds structured requests such as `VERSION` or `PING` inside the
//! text of ordinary `PRIVMSG` and `NOTICE` messages, delimited by the
//! `\x01` byte. This crate provides:
//!
//! - Lazy extraction of every embedded token from a line of chat text
//! - Low-level quoting and unquoting of encoded arguments
//! - Construction of outgoing CTCP-wrapped payloads
//! - Just enough IRC line and prefix parsing to feed the above
//!
//! The crate is pure: no I/O, no async, no global state.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_ctcp::{build_message, extract};
//!
//! let tokens: Vec<_> = extract("hello \x01VERSION\x01 and \x01PING 42\x01").collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].command, "VERSION");
//! assert_eq!(tokens[1].args, vec!["42".to_string()]);
//!
//! // Arguments of encoded commands are quoted on the way out.
//! assert_eq!(build_message("VERSION", ["a b"]), "\x01VERSION a\\@b\x01");
//! // Everything else goes out verbatim.
//! assert_eq!(build_message("ACTION", ["a b"]), "\x01ACTION a b\x01");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod ctcp;
pub mod error;
pub mod line;
pub mod prefix;
pub mod quote;

pub use self::ctcp::{
    build_message, extract, is_ctcp, strip_tokens, CtcpKind, CtcpToken, Tokens, CTCP_DELIM,
};
pub use self::error::LineError;
pub use self::line::{notice_line, privmsg_line, InboundText, Line};
pub use self::prefix::Prefix;
pub use self::quote::{is_encoded, quote, unquote, ENCODED_COMMANDS};
