//! Matching configuration.

use std::ops::RangeInclusive;

/// Configuration parameters for ride matching.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Fewest seats a single request may ask for.
    pub min_seats_per_request: u32,

    /// Most seats a single request may ask for.
    /// Shared rides only take single or double seat requests.
    pub max_seats_per_request: u32,

    /// Longest multi-hop itinerary to search for, in hops.
    /// `None` searches without a depth limit.
    pub max_hops: Option<usize>,
}

impl MatchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        min_seats_per_request: u32,
        max_seats_per_request: u32,
        max_hops: Option<usize>,
    ) -> Self {
        Self {
            min_seats_per_request,
            max_seats_per_request,
            max_hops,
        }
    }

    /// Returns the accepted seat range for a request.
    pub fn seat_range(&self) -> RangeInclusive<u32> {
        self.min_seats_per_request..=self.max_seats_per_request
    }

    /// Returns true if a request for `seats` is within range.
    pub fn accepts(&self, seats: u32) -> bool {
        self.seat_range().contains(&seats)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_seats_per_request: 1,
            max_seats_per_request: 2,
            max_hops: None,
        }
    }
}
