//! Telemetry utilities for dispatch timing and logging setup.

use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "SLCTCP_LOG_FORMAT";

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`, defaulting to `info`. Logs go to stderr so stdout
/// stays free for the IRC line stream. `SLCTCP_LOG_FORMAT=json` switches to
/// one JSON object per event.
pub fn init_tracing() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr);

    if wants_json(std::env::var(LOG_FORMAT_ENV).ok().as_deref()) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}

/// Guard for timing a CTCP dispatch and recording metrics.
///
/// Records dispatch latency when dropped.
pub struct DispatchTimer {
    command: String,
    start: Instant,
}

impl DispatchTimer {
    /// Start timing a dispatch.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for DispatchTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_dispatch(&self.command, duration);
    }
}

/// Standardized span constructors for CTCP observability.
pub mod spans {
    use slirc_ctcp::Prefix;
    use tracing::{Span, debug_span, info_span};

    /// Create a span for one connection's delivery worker.
    pub fn connection(id: u64) -> Span {
        info_span!("connection", id = id)
    }

    /// Create a span for dispatching one decoded token.
    pub fn dispatch(command: &str, sender: &Prefix, direction: &'static str) -> Span {
        debug_span!("ctcp.dispatch", command = %command, sender = %sender, direction = direction)
    }
}
