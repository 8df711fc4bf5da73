use std::collections::VecDeque;

/// Outcome of offering one datagram to the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Appended at the tail.
    Buffered,
    /// Ring was full; the oldest entry was evicted to make room.
    Evicted,
    /// Datagram exceeded the per-item ceiling and was discarded.
    Oversized,
}

/// Bounded ring of pending datagrams, insertion-ordered.
///
/// Holds at most `capacity` entries. When full, [`push`](Self::push)
/// evicts the oldest entry — a sliding-window policy favoring recency:
/// for a live video feed, stale packets are worthless.
///
/// Each entry's length is bounded by `max_item_size` at ingest; the
/// total buffered byte count is only bounded at flush time, when
/// [`take_batch`](Self::take_batch) applies the per-batch budget.
#[derive(Debug)]
pub struct PacketRing {
    entries: VecDeque<Vec<u8>>,
    capacity: usize,
    max_item_size: usize,
}

impl PacketRing {
    pub fn new(capacity: usize, max_item_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            max_item_size,
        }
    }

    /// Offer one datagram to the ring.
    ///
    /// Oversized datagrams are discarded without touching the ring: they
    /// could never fit a batch on their own, so buffering them would only
    /// waste a slot. When the ring is full the oldest entry is evicted.
    pub fn push(&mut self, datagram: Vec<u8>) -> IngestOutcome {
        if datagram.len() > self.max_item_size {
            return IngestOutcome::Oversized;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.entries.push_back(datagram);
            return IngestOutcome::Evicted;
        }
        self.entries.push_back(datagram);
        IngestOutcome::Buffered
    }

    /// Remove and return the newest entries that fit the batch limits.
    ///
    /// Walks from the most recently inserted entry backward, accumulating
    /// entries while the cumulative byte length stays within `max_bytes`
    /// and the count within `max_count`. The walk stops at the first
    /// entry that would violate either limit. Included entries are
    /// removed and returned newest-first; the remainder stays in the ring
    /// in its original relative order, waiting for a later flush.
    pub fn take_batch(&mut self, max_bytes: usize, max_count: usize) -> Vec<Vec<u8>> {
        let mut bytes = 0usize;
        let mut count = 0usize;
        for entry in self.entries.iter().rev() {
            if count == max_count || bytes + entry.len() > max_bytes {
                break;
            }
            bytes += entry.len();
            count += 1;
        }

        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(entry) = self.entries.pop_back() {
                batch.push(entry);
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest-first, as stored.
    #[cfg(test)]
    fn contents(&self) -> Vec<&[u8]> {
        self.entries.iter().map(Vec::as_slice).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datagram(tag: u8, len: usize) -> Vec<u8> {
        vec![tag; len]
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut ring = PacketRing::new(8, 1450);
        for i in 0..100u8 {
            ring.push(datagram(i, 10));
            assert!(ring.len() <= 8);
        }
        assert_eq!(ring.len(), 8);
    }

    #[test]
    fn oversized_is_silently_discarded() {
        let mut ring = PacketRing::new(4, 1450);
        ring.push(datagram(1, 100));
        let before = ring.contents().len();

        assert_eq!(ring.push(datagram(2, 1451)), IngestOutcome::Oversized);
        assert_eq!(ring.len(), before);
        assert_eq!(ring.contents(), vec![&[1u8; 100][..]]);
    }

    #[test]
    fn boundary_sized_item_accepted() {
        let mut ring = PacketRing::new(4, 1450);
        assert_eq!(ring.push(datagram(1, 1450)), IngestOutcome::Buffered);
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn full_ring_evicts_oldest() {
        let mut ring = PacketRing::new(3, 1450);
        for i in 0..3u8 {
            assert_eq!(ring.push(datagram(i, 4)), IngestOutcome::Buffered);
        }
        assert_eq!(ring.push(datagram(3, 4)), IngestOutcome::Evicted);

        // Oldest (tag 0) gone, order of the rest preserved, newest at tail.
        assert_eq!(
            ring.contents(),
            vec![&[1u8; 4][..], &[2u8; 4][..], &[3u8; 4][..]]
        );
    }

    #[test]
    fn take_batch_is_newest_first() {
        let mut ring = PacketRing::new(8, 1450);
        ring.push(datagram(b'a', 4));
        ring.push(datagram(b'b', 4));
        ring.push(datagram(b'c', 4));

        let batch = ring.take_batch(1450, 255);
        assert_eq!(
            batch,
            vec![datagram(b'c', 4), datagram(b'b', 4), datagram(b'a', 4)]
        );
        assert!(ring.is_empty());
    }

    #[test]
    fn take_batch_stops_at_byte_budget() {
        let mut ring = PacketRing::new(8, 1450);
        ring.push(datagram(b'a', 500));
        ring.push(datagram(b'b', 500));
        ring.push(datagram(b'c', 500));

        // c(500) + b(500) fit; adding a(500) would exceed 1450.
        let batch = ring.take_batch(1450, 255);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0][0], b'c');
        assert_eq!(batch[1][0], b'b');

        // The remainder stays for the next flush, order intact.
        assert_eq!(ring.contents(), vec![&[b'a'; 500][..]]);
        let rest = ring.take_batch(1450, 255);
        assert_eq!(rest, vec![datagram(b'a', 500)]);
    }

    #[test]
    fn take_batch_stops_at_count_limit() {
        let mut ring = PacketRing::new(8, 1450);
        for i in 0..6u8 {
            ring.push(datagram(i, 4));
        }
        let batch = ring.take_batch(1450, 4);
        assert_eq!(batch.len(), 4);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.contents(), vec![&[0u8; 4][..], &[1u8; 4][..]]);
    }

    #[test]
    fn take_batch_stops_at_first_violating_entry() {
        let mut ring = PacketRing::new(8, 1450);
        ring.push(datagram(b'a', 10)); // would fit, but sits behind b
        ring.push(datagram(b'b', 1000));
        ring.push(datagram(b'c', 1000));

        // c fits; b violates the budget; the walk stops there even though
        // a alone would still fit.
        let batch = ring.take_batch(1450, 255);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0][0], b'c');
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn take_batch_on_empty_ring() {
        let mut ring = PacketRing::new(8, 1450);
        assert!(ring.take_batch(1450, 255).is_empty());
    }
}
