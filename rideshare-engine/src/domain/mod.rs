//! Domain types for the ride sharing engine.
//!
//! This module contains the entity model: users, vehicles and rides, plus
//! the validated names they are keyed by. Names enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod error;
mod names;
mod ride;
mod route;
mod user;
mod vehicle;

pub use error::DomainError;
pub use names::{InvalidName, Location, PlateNumber, UserName, VehicleClass};
pub use ride::{Booking, Ride, RideId};
pub use route::Route;
pub use user::User;
pub use vehicle::{Vehicle, VehicleId};
