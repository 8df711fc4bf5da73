//! Real-time RTP datagram aggregation and framing relay for V2X.
//!
//! The relay accepts a continuous stream of RTP datagrams over UDP,
//! buffers them in a bounded ring, and every flush period drains the
//! newest datagrams that fit one MTU-sized batch into a single framed
//! "super-packet" for a downstream OBU — optionally wrapped in a TLV
//! broadcast envelope.
//!
//! - [`buffer`] — the bounded packet ring and its drop/eviction policy.
//! - [`frame`] — the batch wire codec.
//! - [`envelope`] — the optional TLV envelope codec.
//! - [`aggregator`] — the batching policy tying ring, frame, and envelope
//!   together.
//! - [`relay`] — the service: ingest thread, flush timer, fatal-only
//!   termination.
//! - [`transport`] — the `Receive`/`Transmit` seams and their UDP
//!   implementations.

pub mod aggregator;
pub mod buffer;
pub mod config;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod relay;
pub mod transport;

pub use aggregator::{Aggregator, FlushOutcome};
pub use buffer::{IngestOutcome, PacketRing};
pub use config::RelayConfig;
pub use envelope::EnvelopeConfig;
pub use error::{Direction, RelayError, Result};
pub use relay::Relay;
