//! Error types for the relay library.

use std::fmt;

/// Errors that can occur in the relay library.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Transport**: [`Io`](Self::Io) — socket failures;
///   [`ConnectionBroken`](Self::ConnectionBroken) — a zero-length receive
///   or zero-byte send result, fatal by design.
/// - **Framing**: [`Frame`](Self::Frame) — malformed batch frames on the
///   decode path.
/// - **Startup**: [`InvalidConfig`](Self::InvalidConfig) — rejected before
///   the service starts; [`AlreadyRunning`](Self::AlreadyRunning).
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Underlying I/O or socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport endpoint signalled closure: a zero-length receive on
    /// the inbound side, or a zero-byte send result on the outbound side.
    /// A live feed has no local recovery once the socket layer fails, so
    /// the service terminates.
    #[error("connection broken ({direction})")]
    ConnectionBroken { direction: Direction },

    /// Configuration rejected by [`RelayConfig::validate`](crate::RelayConfig::validate).
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Failed to decode a batch frame.
    #[error("malformed batch frame: {kind}")]
    Frame { kind: FrameErrorKind },

    /// [`Relay::start`](crate::Relay::start) was called while already running.
    #[error("relay already running")]
    AlreadyRunning,
}

/// Which side of the relay a broken connection was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The ingest socket receiving datagrams from the video pipeline.
    Inbound,
    /// The egress socket sending framed batches to the OBU.
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => write!(f, "inbound"),
            Self::Outbound => write!(f, "outbound"),
        }
    }
}

/// Specific kind of batch frame decode failure.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameErrorKind {
    /// Frame shorter than the fixed header or the declared length table.
    TruncatedHeader,
    /// The packet type byte is not the aggregated-batch tag.
    UnexpectedType,
    /// Declared item lengths overrun the frame.
    TruncatedPayload,
    /// Bytes remain after the last declared item.
    TrailingBytes,
}

impl fmt::Display for FrameErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedHeader => write!(f, "truncated header"),
            Self::UnexpectedType => write!(f, "unexpected packet type"),
            Self::TruncatedPayload => write!(f, "truncated payload"),
            Self::TrailingBytes => write!(f, "trailing bytes"),
        }
    }
}

/// Convenience alias for `Result<T, RelayError>`.
pub type Result<T> = std::result::Result<T, RelayError>;
