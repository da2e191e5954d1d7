//! Prometheus metrics collection for slctcp.
//!
//! Tracks CTCP traffic and the health of the per-connection reply queues.
//!
//! - `ctcp_requests_total{command}` - Requests decoded from PRIVMSG
//! - `ctcp_responses_total{command}` - Replies decoded from NOTICE
//! - `ctcp_dispatch_duration_seconds{command}` - Handler latency histogram
//! - `ctcp_replies_{queued,dropped,sent}_total` - Reply queue throughput
//! - `ctcp_reply_schedulers` - Live per-connection delivery workers
//!
//! Command labels are limited to known CTCP names; anything else is
//! recorded as `OTHER` so remote users cannot grow the label set.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use slirc_ctcp::CtcpKind;
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// CTCP requests received, by command.
pub static REQUESTS: OnceLock<IntCounterVec> = OnceLock::new();

/// CTCP replies received, by command.
pub static RESPONSES: OnceLock<IntCounterVec> = OnceLock::new();

/// Replies accepted into a connection's queue.
pub static REPLIES_QUEUED: OnceLock<IntCounter> = OnceLock::new();

/// Replies discarded because the queue was full.
pub static REPLIES_DROPPED: OnceLock<IntCounter> = OnceLock::new();

/// Replies handed to the transmit primitive successfully.
pub static REPLIES_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Transmit failures by error kind.
pub static TRANSMIT_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Handler failures by command and error kind.
pub static HANDLER_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges and histograms
// ========================================================================

/// Live reply schedulers (one per connection).
pub static ACTIVE_SCHEDULERS: OnceLock<IntGauge> = OnceLock::new();

/// Dispatch latency by command.
pub static DISPATCH_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Safe to call more than once; only the first call registers anything.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                match $init {
                    Ok(m) => {
                        if let Err(e) = r.register(Box::new(m.clone())) {
                            tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                        }
                        let _ = $metric.set(m);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                    }
                }
            }
        };
    }

    register!(REQUESTS, IntCounterVec::new(Opts::new("ctcp_requests_total", "CTCP requests received by command"), &["command"]));
    register!(RESPONSES, IntCounterVec::new(Opts::new("ctcp_responses_total", "CTCP replies received by command"), &["command"]));
    register!(REPLIES_QUEUED, IntCounter::new("ctcp_replies_queued_total", "CTCP replies accepted into a reply queue"));
    register!(REPLIES_DROPPED, IntCounter::new("ctcp_replies_dropped_total", "CTCP replies dropped because the reply queue was full"));
    register!(REPLIES_SENT, IntCounter::new("ctcp_replies_sent_total", "CTCP replies transmitted"));
    register!(TRANSMIT_ERRORS, IntCounterVec::new(Opts::new("ctcp_transmit_errors_total", "Transmit failures by kind"), &["error"]));
    register!(HANDLER_ERRORS, IntCounterVec::new(Opts::new("ctcp_handler_errors_total", "CTCP handler failures"), &["command", "error"]));
    register!(ACTIVE_SCHEDULERS, IntGauge::new("ctcp_reply_schedulers", "Live per-connection reply schedulers"));
    register!(DISPATCH_LATENCY, HistogramVec::new(
        HistogramOpts::new("ctcp_dispatch_duration_seconds", "CTCP dispatch latency by command")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["command"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Bounded label for a command name.
fn command_label(command: &str) -> &'static str {
    match CtcpKind::parse(command) {
        CtcpKind::Action => "ACTION",
        CtcpKind::Version => "VERSION",
        CtcpKind::Ping => "PING",
        CtcpKind::Time => "TIME",
        CtcpKind::Userinfo => "USERINFO",
        CtcpKind::Clientinfo => "CLIENTINFO",
        CtcpKind::Source => "SOURCE",
        CtcpKind::Finger => "FINGER",
        CtcpKind::Dcc => "DCC",
        CtcpKind::Errmsg => "ERRMSG",
        _ => "OTHER",
    }
}

/// Record a decoded request.
#[inline]
pub fn record_request(command: &str) {
    if let Some(c) = REQUESTS.get() {
        c.with_label_values(&[command_label(command)]).inc();
    }
}

/// Record a decoded reply.
#[inline]
pub fn record_response(command: &str) {
    if let Some(c) = RESPONSES.get() {
        c.with_label_values(&[command_label(command)]).inc();
    }
}

/// Record dispatch latency.
#[inline]
pub fn record_dispatch(command: &str, duration_secs: f64) {
    if let Some(h) = DISPATCH_LATENCY.get() {
        h.with_label_values(&[command_label(command)])
            .observe(duration_secs);
    }
}

/// Record a handler failure.
#[inline]
pub fn record_handler_error(command: &str, error: &str) {
    if let Some(c) = HANDLER_ERRORS.get() {
        c.with_label_values(&[command_label(command), error]).inc();
    }
}

#[inline]
pub fn record_reply_queued() {
    if let Some(c) = REPLIES_QUEUED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_reply_dropped() {
    if let Some(c) = REPLIES_DROPPED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_reply_sent() {
    if let Some(c) = REPLIES_SENT.get() {
        c.inc();
    }
}

#[inline]
pub fn record_transmit_error(error: &str) {
    if let Some(c) = TRANSMIT_ERRORS.get() {
        c.with_label_values(&[error]).inc();
    }
}

/// Track scheduler creation (`+1`) and teardown (`-1`).
#[inline]
pub fn adjust_schedulers(delta: i64) {
    if let Some(g) = ACTIVE_SCHEDULERS.get() {
        g.add(delta);
    }
}
