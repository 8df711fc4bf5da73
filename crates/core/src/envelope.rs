//! Optional TLV broadcast envelope.
//!
//! When the relay targets a broadcast channel, each framed batch is
//! wrapped in a fixed-width header the OBU firmware uses for channel
//! routing (big-endian, no padding):
//!
//! ```text
//! +----------+----------------+----------+------------+-------+---------+
//! | AID (4)  | traffic period | priority | traffic id | flags | payload |
//! |          |      (4)       |   (4)    |    (4)     |  (1)  |   ...   |
//! +----------+----------------+----------+------------+-------+---------+
//! ```
//!
//! Bit 0 of the flags byte is the one-shot "new message" flag. The four
//! u32 header fields are the contract surface with the OBU firmware; keep
//! them byte-for-byte stable.
//!
//! The codec is stateless: [`wrap`] reads the configuration, builds the
//! header, appends the payload, and retains nothing.

/// Configuration for the TLV broadcast envelope.
///
/// Defaults match the OBU broadcast channel this relay was built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Application / channel id.
    pub aid: u32,
    /// Traffic period announced to the channel.
    pub traffic_period: u32,
    /// Channel priority.
    pub priority: u32,
    /// Traffic id.
    pub traffic_id: u32,
    /// One-shot "new message" flag; each envelope is constructed fresh
    /// per batch, so this is normally left on.
    pub new_message: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            aid: 0x70,
            traffic_period: 0x0b,
            priority: 0x7f,
            traffic_id: 0xffff,
            new_message: true,
        }
    }
}

/// Envelope header length: four u32 fields plus the flags byte.
pub const HEADER_LEN: usize = 17;

/// Wrap a framed batch in the broadcast envelope.
///
/// Pure function of `(payload, config)`; fixed-width fields cannot
/// overflow given a validated configuration.
pub fn wrap(payload: &[u8], config: &EnvelopeConfig) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_LEN + payload.len());
    message.extend_from_slice(&config.aid.to_be_bytes());
    message.extend_from_slice(&config.traffic_period.to_be_bytes());
    message.extend_from_slice(&config.priority.to_be_bytes());
    message.extend_from_slice(&config.traffic_id.to_be_bytes());
    message.push(config.new_message as u8);
    message.extend_from_slice(payload);
    message
}
