//! Transmit primitive writing raw IRC lines to an async writer.

use super::Transmit;
use crate::error::TransmitError;
use async_trait::async_trait;
use slirc_ctcp::{notice_line, privmsg_line};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::trace;

/// Writes `NOTICE`/`PRIVMSG` lines to any [`AsyncWrite`].
///
/// The writer is behind a mutex so lines from the delivery worker and from
/// direct request sends never interleave.
pub struct LineWriter<W> {
    writer: Mutex<W>,
}

impl<W> LineWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the wrapper and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn write_line(&self, line: &str) -> Result<(), TransmitError> {
        trace!(line = %line.trim_end(), "Writing line");
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<W> Transmit for LineWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn notice(&self, target: &str, text: &str) -> Result<(), TransmitError> {
        self.write_line(&notice_line(target, text)).await
    }

    async fn privmsg(&self, target: &str, text: &str) -> Result<(), TransmitError> {
        self.write_line(&privmsg_line(target, text)).await
    }
}
