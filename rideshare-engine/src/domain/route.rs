//! Origin/destination pairs.

use std::fmt;

use super::Location;

/// A directed origin → destination pair.
///
/// Offers and requests are always made for one route; the route is also the
/// key of the route index and an edge of the route graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    pub origin: Location,
    pub destination: Location,
}

impl Route {
    /// Creates a new route.
    pub fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Returns true if origin and destination are the same stop.
    pub fn is_loop(&self) -> bool {
        self.origin == self.destination
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::new(s).unwrap()
    }

    #[test]
    fn display() {
        let route = Route::new(loc("Bangalore"), loc("Mysore"));
        assert_eq!(route.to_string(), "Bangalore -> Mysore");
    }

    #[test]
    fn direction_matters() {
        let there = Route::new(loc("Bangalore"), loc("Mysore"));
        let back = Route::new(loc("Mysore"), loc("Bangalore"));
        assert_ne!(there, back);
        assert!(!there.is_loop());
        assert!(Route::new(loc("Pune"), loc("Pune")).is_loop());
    }
}
