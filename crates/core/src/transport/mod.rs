//! Transport seams for the relay.
//!
//! The aggregation core talks to the outside world through two traits,
//! so the batching policy is testable without sockets:
//!
//! - [`Receive`] — the blocking datagram source feeding the ingest path.
//! - [`Transmit`] — the datagram sink consuming framed batches.
//!
//! [`udp`] provides the production implementations over UDP.

pub mod udp;

pub use udp::{UdpEgress, UdpIngress};

use crate::error::Result;

/// Blocking datagram source for the ingest path.
pub trait Receive: Send {
    /// Block until the next datagram arrives and return its bytes.
    ///
    /// A zero-length result signals that the transport endpoint closed;
    /// the ingest path treats it as fatal.
    fn receive(&mut self) -> Result<Vec<u8>>;
}

/// Datagram sink for framed batches.
pub trait Transmit: Send {
    /// Send one framed batch, returning the number of bytes handed to
    /// the transport. A zero return signals a broken outbound connection
    /// and is fatal.
    fn transmit(&mut self, payload: &[u8]) -> Result<usize>;
}
