use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::Result;
use crate::transport::{Receive, Transmit};

/// Receive buffer size, comfortably above the per-item ceiling.
const RECV_BUF_LEN: usize = 2048;

/// Interval at which a blocked receive wakes to let the service observe
/// its stop flag.
const RECV_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// UDP ingest socket receiving RTP datagrams from the video pipeline.
///
/// Bound to a fixed local address with a single expected peer. The
/// socket carries a read timeout of [`RECV_POLL_INTERVAL`] so the ingest
/// loop can check the running flag between datagrams; timeouts surface
/// as `WouldBlock`/`TimedOut` I/O errors, which the loop absorbs.
pub struct UdpIngress {
    socket: UdpSocket,
    buf: [u8; RECV_BUF_LEN],
}

impl UdpIngress {
    /// Bind the ingest socket to the configured local address.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(RECV_POLL_INTERVAL))?;
        tracing::info!(%addr, "ingress socket bound");
        Ok(Self {
            socket,
            buf: [0u8; RECV_BUF_LEN],
        })
    }
}

impl Receive for UdpIngress {
    fn receive(&mut self) -> Result<Vec<u8>> {
        let (len, _peer) = self.socket.recv_from(&mut self.buf)?;
        Ok(self.buf[..len].to_vec())
    }
}

/// UDP egress socket sending framed batches to the OBU.
///
/// Binds a single ephemeral socket (`0.0.0.0:0`); the remote address is
/// fixed at construction. This layer is deliberately address-only — it
/// knows nothing about batches or envelopes.
pub struct UdpEgress {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpEgress {
    /// Bind an ephemeral socket for outbound batches.
    pub fn bind(remote: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        tracing::info!(%remote, "egress socket bound");
        Ok(Self { socket, remote })
    }
}

impl Transmit for UdpEgress {
    fn transmit(&mut self, payload: &[u8]) -> Result<usize> {
        Ok(self.socket.send_to(payload, self.remote)?)
    }
}
