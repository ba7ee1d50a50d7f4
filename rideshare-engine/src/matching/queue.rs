//! Max-priority bucket of rides for one vehicle class.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::binary_heap::PeekMut;

use crate::domain::RideId;

/// Priority key of a ride inside a bucket.
///
/// Keys order by available seats; on equal seats the lower ride id (the
/// earlier offer) ranks higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatKey {
    pub seats: u32,
    pub ride: RideId,
}

impl SeatKey {
    pub fn new(seats: u32, ride: RideId) -> Self {
        Self { seats, ride }
    }
}

impl Ord for SeatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seats
            .cmp(&other.seats)
            .then_with(|| other.ride.cmp(&self.ride))
    }
}

impl PartialOrd for SeatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rides of one class on one route, ordered by available seats.
///
/// Only rides with at least one free seat are kept; `replace_top` evicts the
/// top entry when its seats drop to zero.
#[derive(Debug, Clone, Default)]
pub struct RideQueue {
    heap: BinaryHeap<SeatKey>,
}

impl RideQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ride. Zero-seat keys are ignored.
    pub fn push(&mut self, key: SeatKey) {
        if key.seats > 0 {
            self.heap.push(key);
        }
    }

    /// The ride with the most available seats.
    pub fn peek_max(&self) -> Option<SeatKey> {
        self.heap.peek().copied()
    }

    /// Remove and return the ride with the most available seats.
    pub fn pop_max(&mut self) -> Option<SeatKey> {
        self.heap.pop()
    }

    /// Set the top entry's seats to `seats` and restore heap order.
    ///
    /// A top entry left with zero seats is removed. Returns the updated key,
    /// or `None` if the queue was empty.
    pub fn replace_top(&mut self, seats: u32) -> Option<SeatKey> {
        let mut top = self.heap.peek_mut()?;
        if seats == 0 {
            let mut key = PeekMut::pop(top);
            key.seats = 0;
            return Some(key);
        }
        top.seats = seats;
        Some(*top)
    }

    /// Remove an arbitrary entry. Returns false if `key` is not present.
    ///
    /// This is linear in the bucket size; buckets are expected to stay small.
    pub fn remove(&mut self, key: SeatKey) -> bool {
        let before = self.heap.len();
        self.heap.retain(|k| *k != key);
        self.heap.len() != before
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sum of available seats over all entries.
    pub fn total_seats(&self) -> u64 {
        self.heap.iter().map(|k| u64::from(k.seats)).sum()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Popping everything yields keys in non-increasing order
        #[test]
        fn pops_in_priority_order(seats in proptest::collection::vec(1u32..6, 0..30)) {
            let mut q = RideQueue::new();
            for (i, s) in seats.iter().enumerate() {
                q.push(SeatKey::new(*s, RideId(i as u64 + 1)));
            }

            let mut prev: Option<SeatKey> = None;
            while let Some(k) = q.pop_max() {
                if let Some(p) = prev {
                    prop_assert!(p > k);
                    prop_assert!(p.seats >= k.seats);
                }
                prev = Some(k);
            }
        }

        /// Removing any present key keeps the maximum correct
        #[test]
        fn remove_keeps_max(
            seats in proptest::collection::vec(1u32..6, 1..20),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut q = RideQueue::new();
            let keys: Vec<SeatKey> = seats
                .iter()
                .enumerate()
                .map(|(i, s)| SeatKey::new(*s, RideId(i as u64 + 1)))
                .collect();
            for k in &keys {
                q.push(*k);
            }

            let victim = keys[pick.index(keys.len())];
            prop_assert!(q.remove(victim));

            let expected = keys.iter().filter(|k| **k != victim).max().copied();
            prop_assert_eq!(q.peek_max(), expected);
        }
    }
}
