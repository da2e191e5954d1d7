//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Client Defaults
// =============================================================================

pub fn default_nick() -> String {
    "slctcp".to_string()
}

// =============================================================================
// CTCP Reply Defaults
// =============================================================================

/// Replies held per connection before new ones are dropped.
pub fn default_reply_queue_size() -> usize {
    10
}

/// Minimum seconds between two replies on one connection.
pub fn default_reply_rate() -> f64 {
    0.25
}

pub fn default_version() -> String {
    format!("slctcp {}", env!("CARGO_PKG_VERSION"))
}

pub fn default_source() -> String {
    env!("CARGO_PKG_REPOSITORY").to_string()
}
