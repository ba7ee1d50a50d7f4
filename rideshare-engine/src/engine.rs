//! Ride lifecycle orchestration.
//!
//! `RideShare` is the call surface of the engine: registration, offers,
//! direct and multi-hop selection, ending rides and reporting. It validates
//! every request before touching shared state and then delegates to the
//! registry and the route index.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    DomainError, Location, PlateNumber, Ride, RideId, Route, UserName, VehicleClass, VehicleId,
};
use crate::index::RouteIndex;
use crate::matching::{MatchConfig, Preference};
use crate::planner::{PathRequest, PathSearch, Planner};
use crate::registry::{Registry, VehicleRegistration};
use crate::stats::UserStats;

/// Hard errors surfaced to callers.
///
/// A request that simply finds no match is not an error; it yields `None`
/// or an empty itinerary instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Entity lookup or seat accounting failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Seat request outside the supported range
    #[error("requested {requested} seat(s), must be between {min} and {max}")]
    SeatsOutOfRange { requested: u32, min: u32, max: u32 },

    /// Offer without any seat
    #[error("a ride must offer at least one seat")]
    InvalidOfferSeats,
}

/// The ride sharing engine.
///
/// All operations take `&self`; the engine can be shared across threads.
#[derive(Debug, Default)]
pub struct RideShare {
    registry: Registry,
    index: RouteIndex,
    config: MatchConfig,
}

impl RideShare {
    /// Create an engine with an empty registry.
    pub fn new(config: MatchConfig) -> Self {
        Self::with_registry(Registry::new(), config)
    }

    /// Create an engine around an existing registry.
    ///
    /// Rides already held by the registry are indexed in offer order, so
    /// they can be selected and ended like rides offered through the engine.
    pub fn with_registry(registry: Registry, config: MatchConfig) -> Self {
        let index = RouteIndex::new();
        for ride in registry.rides() {
            index.insert(&ride);
        }
        Self {
            registry,
            index,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn index(&self) -> &RouteIndex {
        &self.index
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Register a user. Returns false if the name is already taken.
    pub fn register_user(&self, name: UserName, age: u32, sex: impl Into<String>) -> bool {
        self.registry.register_user(name, age, sex)
    }

    /// Register a vehicle under an existing user.
    pub fn register_vehicle(
        &self,
        owner: &UserName,
        class: VehicleClass,
        plate: PlateNumber,
    ) -> VehicleRegistration {
        self.registry.register_vehicle(owner, class, plate)
    }

    /// Offer a ride with one of the driver's vehicles.
    ///
    /// Returns the new ride's id. Fails if the driver or vehicle is unknown
    /// or the vehicle already carries an offered ride.
    pub fn offer_ride(
        &self,
        driver: &UserName,
        route: Route,
        seats: u32,
        class: &VehicleClass,
        plate: &PlateNumber,
    ) -> Result<RideId, EngineError> {
        self.registry.require_user(driver)?;
        let vehicle = VehicleId::derive(driver, class, plate);
        if seats == 0 {
            return Err(EngineError::InvalidOfferSeats);
        }

        let id = self.registry.claim_vehicle(&vehicle)?;
        let ride = Arc::new(Ride::new(
            id,
            driver.clone(),
            route,
            vehicle,
            class.clone(),
            seats,
        ));

        self.registry.insert_ride(ride.clone());
        self.index.insert(&ride);
        self.registry.record_offer(driver, id)?;

        debug!(ride = %id, route = %ride.route, seats, class = %class, "ride offered");
        Ok(id)
    }

    fn validate_request(&self, passenger: &UserName, seats: u32) -> Result<(), EngineError> {
        self.registry.require_user(passenger)?;
        if !self.config.accepts(seats) {
            return Err(EngineError::SeatsOutOfRange {
                requested: seats,
                min: self.config.min_seats_per_request,
                max: self.config.max_seats_per_request,
            });
        }
        Ok(())
    }

    /// Book `seats` on a single ride covering `route`.
    ///
    /// Returns `Ok(None)` if no ride matches the preference; nothing is
    /// mutated in that case.
    pub fn select_ride(
        &self,
        passenger: &UserName,
        route: &Route,
        seats: u32,
        preference: &Preference,
    ) -> Result<Option<RideId>, EngineError> {
        self.validate_request(passenger, seats)?;
        self.book_hop(passenger, route, seats, preference)
    }

    fn book_hop(
        &self,
        passenger: &UserName,
        route: &Route,
        seats: u32,
        preference: &Preference,
    ) -> Result<Option<RideId>, EngineError> {
        let picked = self.index.select(
            route,
            passenger,
            seats,
            preference,
            self.registry.ride_lookup(),
        )?;

        match picked {
            Some(ride) => {
                self.registry.record_taken(passenger, ride)?;
                debug!(ride = %ride, passenger = %passenger, route = %route, seats, "ride selected");
            }
            None => {
                debug!(passenger = %passenger, route = %route, seats, "no matching ride");
            }
        }
        Ok(picked)
    }

    /// Every path the route search discovers for `seats` seats.
    pub fn search_paths(&self, origin: &Location, destination: &Location, seats: u32) -> PathSearch {
        let request = PathRequest::new(origin.clone(), destination.clone(), seats);
        Planner::new(&self.index, &self.config).search(&request)
    }

    /// The first path from `origin` to `destination`, or an empty vector.
    pub fn find_path(&self, origin: &Location, destination: &Location, seats: u32) -> Vec<Location> {
        crate::planner::find_path(&self.index, &self.config, origin, destination, seats)
    }

    /// Book a chain of rides from `route.origin` to `route.destination`.
    ///
    /// Each hop of the first path found is booked in order with the
    /// most-vacant policy. A hop that finds no ride is skipped and the
    /// remaining hops are still booked; nothing is rolled back. Returns the
    /// booked ride ids in hop order, empty if no path exists.
    pub fn select_multi_hop_ride(
        &self,
        passenger: &UserName,
        route: &Route,
        seats: u32,
    ) -> Result<Vec<RideId>, EngineError> {
        self.validate_request(passenger, seats)?;
        if route.is_loop() {
            debug!(route = %route, "origin and destination are the same stop");
            return Ok(Vec::new());
        }

        let path = self.find_path(&route.origin, &route.destination, seats);
        if path.is_empty() {
            debug!(route = %route, seats, "no itinerary found");
            return Ok(Vec::new());
        }

        let preference = Preference::most_vacant();
        let mut booked = Vec::with_capacity(path.len().saturating_sub(1));
        for stops in path.windows(2) {
            let hop = Route::new(stops[0].clone(), stops[1].clone());
            match self.book_hop(passenger, &hop, seats, &preference)? {
                Some(ride) => booked.push(ride),
                None => {
                    warn!(
                        passenger = %passenger,
                        hop = %hop,
                        seats,
                        "itinerary hop has no matching ride"
                    );
                }
            }
        }
        Ok(booked)
    }

    /// End a ride that has no bookings.
    ///
    /// Returns `Ok(false)` if the ride does not exist. Ending a ride with
    /// active bookings is an error and leaves it in place.
    pub fn end_ride(&self, id: RideId) -> Result<bool, EngineError> {
        let Some(ride) = self.registry.ride(id) else {
            warn!(ride = %id, "ride not found");
            return Ok(false);
        };

        match self.index.remove(&ride) {
            Ok(()) => {}
            // Ended concurrently
            Err(DomainError::UnknownRide(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        self.registry.remove_ride(id);
        self.registry.release_vehicle(&ride.vehicle, id);
        self.registry.record_offer_ended(&ride.driver, id)?;

        debug!(ride = %id, route = %ride.route, "ride ended");
        Ok(true)
    }

    /// Taken/offered counts per user, in registration order.
    pub fn list_stats(&self) -> Vec<UserStats> {
        self.registry.stats()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
