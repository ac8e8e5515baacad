//! Line-oriented adapter between the frontend and the relay.
//!
//! Each input line is one `FrontendRequest` as JSON; each output line is one
//! `RelayNotification` as JSON. Outcomes are written in completion order,
//! not request order.

use dynweather_core::RelayConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::BridgeError;
use crate::notification::{FrontendRequest, RelayNotification};
use crate::relay::{notification_channel, Relay};

/// Counters reported when the bridge shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Triggers dispatched to the relay
    pub requests: usize,
    /// Lines that were not a known notification
    pub rejected: usize,
    /// Outcomes written back
    pub notifications: usize,
}

/// Serve frontend triggers from `reader` until it hits EOF.
///
/// After EOF (or a read error) no new triggers are accepted, but every
/// request already in flight still gets its outcome written before this
/// returns. Lines that are not UTF-8 are rejected like any other bad line.
pub async fn run_bridge<R, W>(
    config: &RelayConfig,
    reader: R,
    mut writer: W,
) -> Result<BridgeStats, BridgeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = notification_channel();
    let mut relay = Some(Relay::new(config, tx)?);
    let mut lines = reader.split(b'\n');
    let mut stats = BridgeStats::default();

    loop {
        tokio::select! {
            segment = lines.next_segment(), if relay.is_some() => {
                match segment {
                    Ok(Some(bytes)) => {
                        if let Some(active) = relay.as_ref() {
                            dispatch(active, &bytes, &mut stats);
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("Frontend input closed, draining in-flight requests");
                        relay = None;
                    }
                    Err(e) => {
                        tracing::error!("Frontend input failed, draining in-flight requests: {}", e);
                        relay = None;
                    }
                }
            }
            notification = rx.recv() => {
                match notification {
                    Some(notification) => {
                        write_notification(&mut writer, &notification).await?;
                        stats.notifications += 1;
                    }
                    None => break,
                }
            }
        }
    }

    writer.flush().await?;
    Ok(stats)
}

fn dispatch(relay: &Relay, bytes: &[u8], stats: &mut BridgeStats) {
    let line = match std::str::from_utf8(bytes) {
        Ok(line) => line.trim(),
        Err(e) => {
            tracing::warn!("Ignoring frontend message that is not UTF-8: {}", e);
            stats.rejected += 1;
            return;
        }
    };
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<FrontendRequest>(line) {
        Ok(request) => {
            tracing::debug!("Dispatching {:?}", request);
            relay.handle(request);
            stats.requests += 1;
        }
        Err(e) => {
            tracing::warn!("Ignoring frontend message: {}", e);
            stats.rejected += 1;
        }
    }
}

async fn write_notification<W>(
    writer: &mut W,
    notification: &RelayNotification,
) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(notification)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;

    tracing::debug!(
        "Sent {} (success: {})",
        notification.name(),
        notification.is_success()
    );
    Ok(())
}
