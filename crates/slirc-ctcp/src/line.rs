//! Minimal IRC line parsing and formatting.
//!
//! CTCP rides inside the trailing parameter of `PRIVMSG` and `NOTICE`.
//! This module splits a raw line just far enough to find the sender, the
//! target and that text, and formats the two outgoing line shapes a CTCP
//! client needs.
//!
//! IRC message format:
//! ```text
//! [@tags] [:prefix] <command> [params...] [:trailing]
//! ```

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::LineError;
use crate::prefix::Prefix;

/// Parse IRCv3 message tags (the part after `@` and before the first space).
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Parse parameters following the command.
///
/// Consecutive spaces count as one separator; a `:` parameter swallows the
/// rest of the line. At most 15 parameters are kept.
fn parse_params(input: &str) -> SmallVec<[&str; 15]> {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        if params.len() >= 15 {
            break;
        }

        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    params
}

/// A parsed IRC line borrowing from the raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    tags: Option<&'a str>,
    prefix: Option<&'a str>,
    command: &'a str,
    params: SmallVec<[&'a str; 15]>,
}

impl<'a> Line<'a> {
    /// Parse one raw line. A trailing CR/LF is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use slirc_ctcp::Line;
    ///
    /// let line = Line::parse(":nick!u@h PRIVMSG me :\x01PING 1\x01\r\n").unwrap();
    /// assert_eq!(line.command(), "PRIVMSG");
    /// assert_eq!(line.arg(1), Some("\x01PING 1\x01"));
    /// ```
    pub fn parse(raw: &'a str) -> Result<Self, LineError> {
        let input = raw.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            return Err(LineError::Empty);
        }

        let malformed = |e: nom::Err<nom::error::Error<&str>>| LineError::Malformed(e.to_string());

        let (input, tags) = opt(parse_tags)(input).map_err(malformed)?;
        let (input, _) = space0(input).map_err(malformed)?;
        let (input, prefix) = opt(parse_prefix)(input).map_err(malformed)?;
        let (input, _) = space0(input).map_err(malformed)?;
        let (input, command) = parse_command(input).map_err(malformed)?;
        let params = parse_params(input);

        Ok(Self {
            tags,
            prefix,
            command,
            params,
        })
    }

    /// Raw tag string without the leading `@`.
    pub fn tags(&self) -> Option<&'a str> {
        self.tags
    }

    /// The origin of the line, if it carried one.
    pub fn prefix(&self) -> Option<Prefix> {
        self.prefix.map(Prefix::parse)
    }

    /// The command as sent (case preserved).
    pub fn command(&self) -> &'a str {
        self.command
    }

    /// Parameter `index`, trailing included.
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }

    /// Classify this line as inbound chat text, if it is any.
    ///
    /// Lines without a prefix or without both target and text are ignored.
    pub fn inbound(&self) -> Option<InboundText<'a>> {
        let sender = self.prefix()?;
        let target = self.arg(0)?;
        let text = self.arg(1)?;
        if self.command.eq_ignore_ascii_case("PRIVMSG") {
            Some(InboundText::Privmsg {
                sender,
                target,
                text,
            })
        } else if self.command.eq_ignore_ascii_case("NOTICE") {
            Some(InboundText::Notice {
                sender,
                target,
                text,
            })
        } else {
            None
        }
    }
}

/// Chat text that may carry CTCP tokens.
///
/// A `Privmsg` carries requests; a `Notice` carries replies, which must
/// never be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundText<'a> {
    /// `PRIVMSG target :text`
    Privmsg {
        /// Who sent it.
        sender: Prefix,
        /// Channel or nickname it was addressed to.
        target: &'a str,
        /// Message body.
        text: &'a str,
    },
    /// `NOTICE target :text`
    Notice {
        /// Who sent it.
        sender: Prefix,
        /// Channel or nickname it was addressed to.
        target: &'a str,
        /// Message body.
        text: &'a str,
    },
}

/// Format `NOTICE target :text\r\n`.
pub fn notice_line(target: &str, text: &str) -> String {
    format!("NOTICE {target} :{text}\r\n")
}

/// Format `PRIVMSG target :text\r\n`.
pub fn privmsg_line(target: &str, text: &str) -> String {
    format!("PRIVMSG {target} :{text}\r\n")
}
