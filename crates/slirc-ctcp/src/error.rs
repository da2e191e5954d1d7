//! Error types for IRC line parsing.

use thiserror::Error;

/// Errors produced while parsing a raw IRC line.
///
/// CTCP extraction itself never fails; only the line framing around it can.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineError {
    /// The line was empty after trimming the line ending.
    #[error("empty line")]
    Empty,

    /// The line could not be split into prefix, command and parameters.
    #[error("malformed line: {0}")]
    Malformed(String),
}
