use std::net::SocketAddr;
use std::time::Duration;

use crate::envelope::EnvelopeConfig;
use crate::error::{RelayError, Result};
use crate::frame;

/// Default local address receiving RTP datagrams from the video pipeline.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(192, 168, 62, 223)), 30300);
/// Default OBU address receiving framed batches.
pub const DEFAULT_REMOTE_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(192, 168, 62, 199)), 30299);

/// Default ring buffer capacity in datagrams.
pub const DEFAULT_CAPACITY: usize = 128;
/// Default per-datagram size ceiling in bytes (downstream transport MTU).
pub const DEFAULT_MAX_ITEM_SIZE: usize = 1450;
/// Default per-batch payload budget in bytes.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1450;
/// Default flush period.
pub const DEFAULT_FLUSH_PERIOD: Duration = Duration::from_millis(80);

/// Immutable relay configuration, constructed once at startup.
///
/// Validated by [`validate`](Self::validate) before the service starts;
/// no size or width check happens again on the hot path.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Local address the ingest socket binds to.
    pub bind_addr: SocketAddr,
    /// Remote OBU address framed batches are sent to.
    pub remote_addr: SocketAddr,
    /// Ring buffer capacity in datagrams.
    pub capacity: usize,
    /// Per-datagram size ceiling; larger datagrams are silently discarded.
    pub max_item_size: usize,
    /// Per-batch payload budget: the concatenated length of the datagrams
    /// included in one flush never exceeds this.
    pub max_batch_size: usize,
    /// Interval between flush ticks.
    pub flush_period: Duration,
    /// TLV broadcast envelope; `None` sends the framed batch bare.
    pub envelope: Option<EnvelopeConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            remote_addr: DEFAULT_REMOTE_ADDR,
            capacity: DEFAULT_CAPACITY,
            max_item_size: DEFAULT_MAX_ITEM_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            flush_period: DEFAULT_FLUSH_PERIOD,
            envelope: None,
        }
    }
}

impl RelayConfig {
    /// Check the configuration before the service starts.
    ///
    /// Rejects anything that would break a wire-format width or allow a
    /// buffered datagram to sit in the ring without ever fitting a batch.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(invalid("ring capacity must be non-zero"));
        }
        if self.flush_period.is_zero() {
            return Err(invalid("flush period must be non-zero"));
        }
        if self.max_item_size == 0 {
            return Err(invalid("max item size must be non-zero"));
        }
        if self.max_item_size > frame::MAX_ITEM_LEN {
            return Err(invalid(
                "max item size must fit the 2-byte wire length field",
            ));
        }
        if self.max_item_size > self.max_batch_size {
            // Otherwise a buffered datagram could never fit any batch and
            // would block the newest-first walk forever.
            return Err(invalid("max item size must not exceed max batch size"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> RelayError {
    RelayError::InvalidConfig {
        reason: reason.to_string(),
    }
}
