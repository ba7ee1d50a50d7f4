//! Ride sharing matching engine.
//!
//! Matches ride offers (a driver, a vehicle and some seats on a route) to
//! passenger requests, either on a single ride or as a multi-hop itinerary
//! chained through intermediate stops.

pub mod domain;
pub mod engine;
pub mod index;
pub mod matching;
pub mod planner;
pub mod registry;
pub mod stats;

pub use engine::{EngineError, RideShare};
