//! Seat matching within a route.
//!
//! Each route keeps one max-priority bucket per vehicle class. A request is
//! served from a single bucket, chosen either explicitly or by the
//! most-vacant policy, and always takes the bucket's top ride.

mod config;
mod queue;
mod route_queue;

pub use config::MatchConfig;
pub use queue::{RideQueue, SeatKey};
pub use route_queue::{Preference, RouteQueue};
