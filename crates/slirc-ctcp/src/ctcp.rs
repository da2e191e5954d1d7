//! CTCP (Client-to-Client Protocol) token extraction and construction.
//!
//! CTCP tokens are embedded within PRIVMSG and NOTICE text, each one
//! wrapped in a pair of `\x01` delimiters. A single line may carry any
//! number of them mixed with ordinary text.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>
//!
//! # Example
//!
//! ```
//! use slirc_ctcp::{extract, CtcpKind};
//!
//! let mut tokens = extract("\x01PING 1700000000\x01");
//! let ping = tokens.next().unwrap();
//! assert_eq!(ping.kind(), CtcpKind::Ping);
//! assert_eq!(ping.args, vec!["1700000000".to_string()]);
//! assert!(tokens.next().is_none());
//! ```

use std::fmt;
use std::iter::FusedIterator;

use crate::quote::{is_encoded, quote, unquote};

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// Known CTCP command types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CtcpKind {
    /// ACTION - describes an action performed by the user.
    /// Commonly triggered by `/me` in IRC clients.
    Action,
    /// VERSION - requests client version information.
    Version,
    /// PING - measures round-trip latency.
    Ping,
    /// TIME - requests local time from the client.
    Time,
    /// USERINFO - requests user-defined information.
    Userinfo,
    /// CLIENTINFO - requests list of supported CTCP commands.
    Clientinfo,
    /// SOURCE - requests source code location.
    Source,
    /// FINGER - requests user information (legacy).
    Finger,
    /// DCC - Direct Client-to-Client connection setup.
    Dcc,
    /// ERRMSG - error reply to a query the peer could not answer.
    Errmsg,
    /// Unknown or custom CTCP command.
    Unknown(String),
}

impl CtcpKind {
    /// Parse a CTCP command name into a `CtcpKind`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "ACTION" => Self::Action,
            "VERSION" => Self::Version,
            "PING" => Self::Ping,
            "TIME" => Self::Time,
            "USERINFO" => Self::Userinfo,
            "CLIENTINFO" => Self::Clientinfo,
            "SOURCE" => Self::Source,
            "FINGER" => Self::Finger,
            "DCC" => Self::Dcc,
            "ERRMSG" => Self::Errmsg,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Returns the canonical uppercase name of this CTCP command.
    ///
    /// `Unknown` keeps the spelling it was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "ACTION",
            Self::Version => "VERSION",
            Self::Ping => "PING",
            Self::Time => "TIME",
            Self::Userinfo => "USERINFO",
            Self::Clientinfo => "CLIENTINFO",
            Self::Source => "SOURCE",
            Self::Finger => "FINGER",
            Self::Dcc => "DCC",
            Self::Errmsg => "ERRMSG",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded CTCP command.
///
/// `command` keeps the case it arrived with; use [`CtcpToken::name`] for
/// lookups. Arguments of encoded commands are already unquoted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtcpToken {
    /// Command name as received.
    pub command: String,
    /// Decoded arguments, possibly empty.
    pub args: Vec<String>,
}

impl CtcpToken {
    /// Create a token from a command name and arguments.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The command type.
    pub fn kind(&self) -> CtcpKind {
        CtcpKind::parse(&self.command)
    }

    /// The command name normalised to uppercase.
    pub fn name(&self) -> String {
        self.command.to_ascii_uppercase()
    }

    /// Decode the inside of one delimited segment.
    ///
    /// Returns `None` when the segment has no command name.
    fn decode(segment: &str) -> Option<Self> {
        let mut words = segment.split(' ').filter(|w| !w.is_empty());
        let command = words.next()?;
        let args = if is_encoded(command) {
            words.map(unquote).collect()
        } else {
            words.map(str::to_owned).collect()
        };
        Some(Self {
            command: command.to_owned(),
            args,
        })
    }
}

impl fmt::Display for CtcpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_message(&self.command, &self.args))
    }
}

/// Lazy iterator over the CTCP tokens embedded in a line.
///
/// Created by [`extract`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl Iterator for Tokens<'_> {
    type Item = CtcpToken;

    fn next(&mut self) -> Option<CtcpToken> {
        loop {
            let open = self.rest.find(CTCP_DELIM)?;
            let after_open = &self.rest[open + 1..];
            let Some(close) = after_open.find(CTCP_DELIM) else {
                // Unterminated segment: nothing more to yield
                self.rest = "";
                return None;
            };
            let segment = &after_open[..close];
            self.rest = &after_open[close + 1..];
            if let Some(token) = CtcpToken::decode(segment) {
                return Some(token);
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}

/// Extract every complete `\x01`-delimited token from `line`, in order.
///
/// Segments are matched non-greedily and never overlap. An unterminated
/// segment and an empty `\x01\x01` pair are skipped silently.
///
/// # Example
///
/// ```
/// use slirc_ctcp::extract;
///
/// let names: Vec<_> = extract("\x01TIME\x01 hi \x01SOURCE\x01 \x01broken")
///     .map(|t| t.command)
///     .collect();
/// assert_eq!(names, ["TIME", "SOURCE"]);
/// ```
pub fn extract(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}

/// Check if a message body contains at least one complete CTCP segment.
#[inline]
pub fn is_ctcp(text: &str) -> bool {
    text.find(CTCP_DELIM)
        .is_some_and(|open| text[open + 1..].contains(CTCP_DELIM))
}

/// Remove every complete CTCP segment from `line`, keeping the rest.
///
/// An unterminated trailing segment is left in place.
pub fn strip_tokens(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find(CTCP_DELIM) {
        let after_open = &rest[open + 1..];
        match after_open.find(CTCP_DELIM) {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after_open[close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Build a CTCP-wrapped payload: `\x01COMMAND arg1 arg2\x01`.
///
/// Arguments are quoted when `command` belongs to the encoded set and
/// used verbatim otherwise.
///
/// # Example
///
/// ```
/// use slirc_ctcp::build_message;
///
/// assert_eq!(build_message("PING", ["12 34"]), "\x01PING 12\\@34\x01");
/// assert_eq!(build_message("TIME", Vec::<String>::new()), "\x01TIME\x01");
/// ```
pub fn build_message<I, S>(command: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let encoded = is_encoded(command);
    let mut out = String::with_capacity(command.len() + 2);
    out.push(CTCP_DELIM);
    out.push_str(command);
    for arg in args {
        out.push(' ');
        if encoded {
            out.push_str(&quote(arg.as_ref()));
        } else {
            out.push_str(arg.as_ref());
        }
    }
    out.push(CTCP_DELIM);
    out
}
