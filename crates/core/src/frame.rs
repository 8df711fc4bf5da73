//! Batch frame wire codec.
//!
//! One flush period's worth of buffered datagrams is framed into a single
//! "super-packet" for the OBU (big-endian, no padding):
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    Type = 4   |   Count = N   |         Item length 0         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      ...      N × u16 item lengths, newest item first         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          concatenated item bytes, newest item first           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! [`encode`] assumes its limits were enforced upstream (the batch walk
//! caps the count at [`MAX_ITEMS`] and startup validation caps item
//! lengths at [`MAX_ITEM_LEN`]); [`decode`] is the exact inverse and is
//! defensive, since it faces the wire.

use crate::error::{FrameErrorKind, RelayError, Result};

/// Packet type tag marking an aggregated RTP batch.
pub const PACKET_TYPE: u8 = 4;
/// The item count is a single byte on the wire.
pub const MAX_ITEMS: usize = u8::MAX as usize;
/// Item lengths are a 2-byte field on the wire.
pub const MAX_ITEM_LEN: usize = u16::MAX as usize;
/// Fixed header: packet type + item count.
pub const HEADER_LEN: usize = 2;
/// Per-item cost in the length table.
pub const ITEM_OVERHEAD: usize = 2;

/// Serialize a batch frame from items already ordered newest-first.
///
/// The caller guarantees `items.len() <= MAX_ITEMS` and every item length
/// `<= MAX_ITEM_LEN`; both hold by construction for batches produced by
/// the ring walk under a validated configuration.
pub fn encode(items: &[Vec<u8>]) -> Vec<u8> {
    debug_assert!(items.len() <= MAX_ITEMS);

    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut frame = Vec::with_capacity(HEADER_LEN + ITEM_OVERHEAD * items.len() + payload_len);

    frame.push(PACKET_TYPE);
    frame.push(items.len() as u8);
    for item in items {
        debug_assert!(item.len() <= MAX_ITEM_LEN);
        frame.extend_from_slice(&(item.len() as u16).to_be_bytes());
    }
    for item in items {
        frame.extend_from_slice(item);
    }
    frame
}

/// Parse a batch frame back into its items, newest-first.
///
/// Exact inverse of [`encode`]: rejects a wrong type tag, truncation, and
/// trailing bytes.
pub fn decode(frame: &[u8]) -> Result<Vec<Vec<u8>>> {
    if frame.len() < HEADER_LEN {
        return frame_err(FrameErrorKind::TruncatedHeader);
    }
    if frame[0] != PACKET_TYPE {
        return frame_err(FrameErrorKind::UnexpectedType);
    }

    let count = frame[1] as usize;
    let table_end = HEADER_LEN + ITEM_OVERHEAD * count;
    if frame.len() < table_end {
        return frame_err(FrameErrorKind::TruncatedHeader);
    }

    let mut items = Vec::with_capacity(count);
    let mut offset = table_end;
    for i in 0..count {
        let at = HEADER_LEN + ITEM_OVERHEAD * i;
        let len = u16::from_be_bytes([frame[at], frame[at + 1]]) as usize;
        let end = offset + len;
        if frame.len() < end {
            return frame_err(FrameErrorKind::TruncatedPayload);
        }
        items.push(frame[offset..end].to_vec());
        offset = end;
    }

    if offset != frame.len() {
        return frame_err(FrameErrorKind::TrailingBytes);
    }
    Ok(items)
}

fn frame_err<T>(kind: FrameErrorKind) -> Result<T> {
    Err(RelayError::Frame { kind })
}
