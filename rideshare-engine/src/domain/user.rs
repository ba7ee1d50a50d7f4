//! User type.

use std::collections::BTreeSet;

use super::{RideId, UserName, VehicleId};

/// A registered user, acting as driver, passenger, or both.
///
/// Users are never removed; the offered/taken counters accumulate history
/// while the active sets track rides that are still live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: UserName,
    pub age: u32,
    pub sex: String,
    vehicles: Vec<VehicleId>,
    active_offered: BTreeSet<RideId>,
    active_taken: BTreeSet<RideId>,
    offered: u32,
    taken: u32,
}

impl User {
    /// Creates a user with no vehicles and no ride history.
    pub fn new(name: UserName, age: u32, sex: impl Into<String>) -> Self {
        Self {
            name,
            age,
            sex: sex.into(),
            vehicles: Vec::new(),
            active_offered: BTreeSet::new(),
            active_taken: BTreeSet::new(),
            offered: 0,
            taken: 0,
        }
    }

    /// Vehicles owned by this user, in registration order.
    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    pub fn add_vehicle(&mut self, vehicle: VehicleId) {
        self.vehicles.push(vehicle);
    }

    /// Record a ride offered by this user as driver.
    pub fn ride_offered(&mut self, ride: RideId) {
        self.active_offered.insert(ride);
        self.offered += 1;
    }

    /// Record a ride taken by this user as passenger.
    pub fn ride_taken(&mut self, ride: RideId) {
        self.active_taken.insert(ride);
        self.taken += 1;
    }

    /// Drop an ended ride from the active offers. The counter is kept.
    pub fn offer_ended(&mut self, ride: RideId) {
        self.active_offered.remove(&ride);
    }

    pub fn active_offered(&self) -> &BTreeSet<RideId> {
        &self.active_offered
    }

    pub fn active_taken(&self) -> &BTreeSet<RideId> {
        &self.active_taken
    }

    /// Total rides ever offered.
    pub fn offered(&self) -> u32 {
        self.offered
    }

    /// Total rides ever taken.
    pub fn taken(&self) -> u32 {
        self.taken
    }
}
