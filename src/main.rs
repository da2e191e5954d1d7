//! slctcp - Straylight CTCP responder
//!
//! Reads raw IRC lines on stdin, answers CTCP requests found in PRIVMSG
//! text, and writes the rate-limited NOTICE replies to stdout. Pair it with
//! any tool that can pipe an IRC connection (for example `socat`).

use anyhow::anyhow;
use slctcp::config::{Config, validate};
use slctcp::network::LineWriter;
use slctcp::{Connection, CtcpClient, Registry, ReplySchedulers, http, metrics, telemetry};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Longest we wait on exit for queued replies to go out.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slctcp.toml".to_string());

    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        warn!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        ));
    }

    info!(
        nick = %config.client.nick,
        reply_queue_size = config.ctcp.reply_queue_size,
        reply_rate = config.ctcp.reply_rate,
        "Starting slctcp"
    );

    metrics::init();
    if let Some(port) = config.metrics.port {
        tokio::spawn(http::run_http_server(port));
    }

    let schedulers = Arc::new(ReplySchedulers::new(&config.ctcp));
    let connection = Connection::new(Arc::new(LineWriter::new(tokio::io::stdout())));
    let client = CtcpClient::new(connection, &config.client.nick, Arc::clone(&schedulers))
        .with_registry(Registry::with_builtins(&config.ctcp));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => client.on_line(&line).await,
                None => {
                    info!("Input closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    // Let queued replies drain before stopping the workers
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while schedulers.pending() > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(schedulers.interval()).await;
    }
    tokio::time::sleep(schedulers.interval()).await;
    schedulers.shutdown();

    info!("slctcp stopped");
    Ok(())
}
