//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, ClientConfig, CtcpConfig, MetricsConfig)
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup validation collecting every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{ClientConfig, Config, ConfigError, CtcpConfig, MetricsConfig};
pub use validation::{ValidationError, validate};
