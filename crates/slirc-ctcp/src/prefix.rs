//! Message origin (sender identity).
//!
//! Inbound CTCP requests are answered to the sender's nickname, so the only
//! part of a prefix this crate really cares about is `nick`. Server names are
//! kept distinct so replies are never addressed to a server.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt;
use std::str::FromStr;

/// IRC message prefix - identifies the origin of a message.
///
/// A prefix can be either a server name (containing a dot) or a user's
/// nick!user@host identifier.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a prefix string into a Prefix.
    ///
    /// Lenient: components are not validated. The host runs from the first
    /// `@` to the end, the user from the first `!` before it. A bare name
    /// containing a dot is a server.
    pub fn parse(s: &str) -> Self {
        let (origin, host) = match s.split_once('@') {
            Some((origin, host)) => (origin, Some(host)),
            None => (s, None),
        };
        let (name, user) = match origin.split_once('!') {
            Some((name, user)) => (name, Some(user)),
            None => (origin, None),
        };

        match (user, host) {
            (None, None) if name.contains('.') => Prefix::ServerName(name.to_owned()),
            _ => Prefix::Nickname(
                name.to_owned(),
                user.unwrap_or_default().to_owned(),
                host.unwrap_or_default().to_owned(),
            ),
        }
    }

    /// Create a new user prefix from nick, user, and host components.
    ///
    /// # Example
    ///
    /// ```
    /// use slirc_ctcp::Prefix;
    ///
    /// let prefix = Prefix::new("nick", "user", "host.example.com");
    /// assert_eq!(prefix.nick(), Some("nick"));
    /// assert_eq!(prefix.to_string(), "nick!user@host.example.com");
    /// ```
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Get the nickname if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Get the hostname.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }

    /// Returns `true` if the message came from a server rather than a user.
    pub fn is_server(&self) -> bool {
        matches!(self, Prefix::ServerName(_))
    }

    /// Where a CTCP reply to this sender goes: its nickname, and nothing else.
    ///
    /// `None` for servers and for user prefixes with an empty nick
    /// (`!user@host`, `@`). Such senders must not be answered, since there
    /// is no valid NOTICE target to answer them on.
    ///
    /// ```
    /// use slirc_ctcp::Prefix;
    ///
    /// assert_eq!(Prefix::parse("alice!a@host").reply_target(), Some("alice"));
    /// assert_eq!(Prefix::parse("!a@host").reply_target(), None);
    /// assert_eq!(Prefix::parse("irc.example.com").reply_target(), None);
    /// ```
    pub fn reply_target(&self) -> Option<&str> {
        self.nick()
    }
}

impl FromStr for Prefix {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Prefix::parse(s))
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{user}")?;
                }
                if !host.is_empty() {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}
