//! Error types for slctcp.
//!
//! None of these reach the transport layer: transmit failures are logged
//! by the delivery worker and handler failures by the dispatcher.

use thiserror::Error;

// ============================================================================
// Transmit Errors (connection write path)
// ============================================================================

/// Errors reported by a connection's transmit primitive.
#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("connection closed")]
    Closed,

    #[error("recipient has no nickname")]
    NoRecipient,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransmitError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::NoRecipient => "no_recipient",
            Self::Io(_) => "io",
        }
    }
}

// ============================================================================
// Handler Errors (CTCP dispatch)
// ============================================================================

/// Errors that can occur inside a CTCP handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("transmit failed: {0}")]
    Transmit(#[from] TransmitError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transmit(_) => "transmit",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for CTCP handlers.
pub type HandlerResult = Result<(), HandlerError>;
