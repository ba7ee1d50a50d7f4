//! Ride types.
//!
//! A `Ride` is one accepted offer: a driver, a vehicle and a fixed seat
//! capacity on one route. Seats only ever go down, through bookings.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{DomainError, Route, UserName, VehicleClass, VehicleId};

/// Identifier of an offered ride.
///
/// Ids are handed out by the registry in increasing order, starting at 1,
/// and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RideId(pub u64);

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seats booked on a ride by one passenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub passenger: UserName,
    pub seats: u32,
}

#[derive(Debug)]
struct RideState {
    available_seats: u32,
    bookings: Vec<Booking>,
}

/// An offered ride.
///
/// Invariant: `available_seats() + booked_seats() == capacity`.
#[derive(Debug)]
pub struct Ride {
    pub id: RideId,
    pub driver: UserName,
    pub route: Route,
    pub vehicle: VehicleId,
    pub class: VehicleClass,
    pub capacity: u32,
    state: Mutex<RideState>,
}

impl Ride {
    /// Creates a ride with all `capacity` seats available.
    pub fn new(
        id: RideId,
        driver: UserName,
        route: Route,
        vehicle: VehicleId,
        class: VehicleClass,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            driver,
            route,
            vehicle,
            class,
            capacity,
            state: Mutex::new(RideState {
                available_seats: capacity,
                bookings: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RideState> {
        // Every mutation validates before writing, so a poisoned state is
        // still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seats still free on this ride.
    pub fn available_seats(&self) -> u32 {
        self.state().available_seats
    }

    /// Total seats booked so far.
    pub fn booked_seats(&self) -> u32 {
        self.state().bookings.iter().map(|b| b.seats).sum()
    }

    /// Number of active bookings.
    pub fn booking_count(&self) -> usize {
        self.state().bookings.len()
    }

    /// Bookings in the order they were made.
    pub fn bookings(&self) -> Vec<Booking> {
        self.state().bookings.clone()
    }

    /// Book `seats` for `passenger`, returning the seats left afterwards.
    ///
    /// Fails without touching the ride if fewer than `seats` are available.
    pub fn book(&self, passenger: UserName, seats: u32) -> Result<u32, DomainError> {
        let mut state = self.state();
        if seats > state.available_seats {
            return Err(DomainError::SeatsUnavailable {
                ride: self.id,
                requested: seats,
                available: state.available_seats,
            });
        }
        state.available_seats -= seats;
        state.bookings.push(Booking { passenger, seats });
        Ok(state.available_seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, PlateNumber};

    fn user(s: &str) -> UserName {
        UserName::new(s).unwrap()
    }

    fn make_ride(capacity: u32) -> Ride {
        let driver = user("Shipra");
        let class = VehicleClass::new("Polo").unwrap();
        let vehicle = VehicleId::derive(&driver, &class, &PlateNumber::new("KA-05-41491").unwrap());
        let route = Route::new(
            Location::new("Bangalore").unwrap(),
            Location::new("Mysore").unwrap(),
        );
        Ride::new(RideId(3), driver, route, vehicle, class, capacity)
    }

    #[test]
    fn new_ride_is_empty() {
        let ride = make_ride(2);
        assert_eq!(ride.available_seats(), 2);
        assert_eq!(ride.booked_seats(), 0);
        assert_eq!(ride.booking_count(), 0);
    }

    #[test]
    fn book_decrements_seats() {
        let ride = make_ride(2);
        assert_eq!(ride.book(user("Nandini"), 1), Ok(1));
        assert_eq!(ride.available_seats(), 1);
        assert_eq!(
            ride.bookings(),
            vec![Booking {
                passenger: user("Nandini"),
                seats: 1
            }]
        );
    }

    #[test]
    fn overbooking_rejected_without_mutation() {
        let ride = make_ride(2);
        ride.book(user("Nandini"), 1).unwrap();

        let err = ride.book(user("Gaurav"), 2).unwrap_err();
        assert_eq!(
            err,
            DomainError::SeatsUnavailable {
                ride: RideId(3),
                requested: 2,
                available: 1
            }
        );
        assert_eq!(ride.available_seats(), 1);
        assert_eq!(ride.booking_count(), 1);
    }

    #[test]
    fn book_to_zero() {
        let ride = make_ride(2);
        assert_eq!(ride.book(user("Nandini"), 2), Ok(0));
        assert!(ride.book(user("Gaurav"), 1).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Location, PlateNumber};
    use proptest::prelude::*;

    proptest! {
        /// Seats available plus seats booked always equals capacity
        #[test]
        fn seat_accounting_holds(
            capacity in 1u32..8,
            requests in proptest::collection::vec(1u32..4, 0..12),
        ) {
            let driver = UserName::new("Driver").unwrap();
            let class = VehicleClass::new("Van").unwrap();
            let vehicle = VehicleId::derive(&driver, &class, &PlateNumber::new("P-1").unwrap());
            let route = Route::new(Location::new("A").unwrap(), Location::new("B").unwrap());
            let ride = Ride::new(RideId(1), driver, route, vehicle, class, capacity);

            for seats in requests {
                let before = ride.available_seats();
                match ride.book(UserName::new("P").unwrap(), seats) {
                    Ok(left) => prop_assert_eq!(left, before - seats),
                    Err(_) => prop_assert_eq!(ride.available_seats(), before),
                }
                prop_assert_eq!(ride.available_seats() + ride.booked_seats(), capacity);
            }
        }
    }
}
