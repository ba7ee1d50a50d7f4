//! Domain error types.
//!
//! These are the hard errors of the entity layer: a referenced entity does
//! not exist, or a mutation would break a ride's seat accounting. Soft
//! failures (no match found) are never reported through this type.

use super::{RideId, UserName, VehicleId};

/// Domain-level errors for entity lookup and ride seat accounting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// No user registered under this name
    #[error("user {0} is not registered")]
    UnknownUser(UserName),

    /// No vehicle registered under this id
    #[error("vehicle {0} is not registered")]
    UnknownVehicle(VehicleId),

    /// No live ride with this id
    #[error("ride {0} not found")]
    UnknownRide(RideId),

    /// The vehicle is already used by an offered ride
    #[error("vehicle {vehicle} already has active ride {ride}")]
    VehicleBusy { vehicle: VehicleId, ride: RideId },

    /// The ride still has passengers booked on it
    #[error("ride {ride} has {bookings} active booking(s) and cannot be ended")]
    RideHasBookings { ride: RideId, bookings: usize },

    /// Booking more seats than the ride has left
    #[error("ride {ride} has {available} seat(s) available, {requested} requested")]
    SeatsUnavailable {
        ride: RideId,
        requested: u32,
        available: u32,
    },
}
