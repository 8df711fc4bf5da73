use std::time::Instant;

use crate::buffer::{IngestOutcome, PacketRing};
use crate::config::RelayConfig;
use crate::envelope;
use crate::error::{Direction, RelayError, Result};
use crate::frame;
use crate::transport::Transmit;

/// Result of one flush tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Ring was empty; nothing was sent.
    Empty,
    /// A batch was framed and transmitted.
    Sent {
        /// Datagrams included in the batch.
        items: usize,
        /// Total bytes handed to the sender (envelope included when enabled).
        bytes: usize,
    },
}

/// Packet aggregation core: bounded ring, batching policy, framing.
///
/// Owns the [`PacketRing`] between ingest and flush. [`ingest`](Self::ingest)
/// is called once per arrived datagram; [`flush`](Self::flush) once per
/// flush period by the timer. Neither blocks — the caller serializes
/// access (one lock held per call, never across the blocking receive).
///
/// All limits come from the validated [`RelayConfig`]; nothing is checked
/// again on the hot path.
pub struct Aggregator {
    ring: PacketRing,
    config: RelayConfig,
    last_flush: Instant,
}

impl Aggregator {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            ring: PacketRing::new(config.capacity, config.max_item_size),
            config,
            last_flush: Instant::now(),
        }
    }

    /// Buffer one received datagram.
    ///
    /// A zero-length datagram is the transport's end-of-stream marker and
    /// yields a fatal [`RelayError::ConnectionBroken`]. Oversized
    /// datagrams are discarded and a full ring evicts its oldest entry;
    /// both are policy, not errors. Never triggers a flush.
    pub fn ingest(&mut self, datagram: Vec<u8>) -> Result<IngestOutcome> {
        if datagram.is_empty() {
            return Err(RelayError::ConnectionBroken {
                direction: Direction::Inbound,
            });
        }
        let outcome = self.ring.push(datagram);
        if outcome == IngestOutcome::Evicted {
            tracing::trace!(pending = self.ring.len(), "ring full, evicted oldest datagram");
        }
        Ok(outcome)
    }

    /// Drain the newest datagrams that fit the batch limits and transmit
    /// them as one framed batch.
    ///
    /// No-op on an empty ring. Entries that miss the byte budget stay in
    /// the ring for the next flush, in their original relative order. A
    /// zero-byte send result is a fatal broken outbound connection.
    pub fn flush(&mut self, sender: &mut dyn Transmit) -> Result<FlushOutcome> {
        if self.ring.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        let items = self
            .ring
            .take_batch(self.config.max_batch_size, frame::MAX_ITEMS);
        let framed = frame::encode(&items);
        let message = match &self.config.envelope {
            Some(envelope_config) => envelope::wrap(&framed, envelope_config),
            None => framed,
        };

        let sent = sender.transmit(&message)?;
        if sent == 0 {
            return Err(RelayError::ConnectionBroken {
                direction: Direction::Outbound,
            });
        }

        tracing::debug!(
            bytes = message.len(),
            items = items.len(),
            pending = self.ring.len(),
            elapsed_ms = self.last_flush.elapsed().as_millis() as u64,
            "batch transmitted"
        );
        self.last_flush = Instant::now();

        Ok(FlushOutcome::Sent {
            items: items.len(),
            bytes: message.len(),
        })
    }

    /// Datagrams currently buffered.
    pub fn pending(&self) -> usize {
        self.ring.len()
    }
}
