//! Owned tables of users, vehicles and rides.
//!
//! The registry is constructed once and handed to the engine, so each
//! engine (and each test) gets isolated state. Ride ids are allocated here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::domain::{
    DomainError, PlateNumber, Ride, RideId, User, UserName, Vehicle, VehicleClass, VehicleId,
};
use crate::stats::UserStats;

/// Outcome of a vehicle registration.
///
/// Registration problems are reported, not raised: nothing is mutated
/// unless the outcome is `Registered`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleRegistration {
    Registered(VehicleId),
    UnknownOwner,
    Duplicate(VehicleId),
}

impl VehicleRegistration {
    pub fn is_registered(&self) -> bool {
        matches!(self, VehicleRegistration::Registered(_))
    }
}

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<UserName, User>,
    /// Registration order, for reporting.
    order: Vec<UserName>,
}

/// Users, vehicles and live rides.
///
/// Lock order: users before vehicles. The ride table is never held while
/// either of the others is taken.
#[derive(Debug)]
pub struct Registry {
    users: RwLock<UserTable>,
    vehicles: RwLock<HashMap<VehicleId, Vehicle>>,
    rides: RwLock<HashMap<RideId, Arc<Ride>>>,
    next_ride_id: AtomicU64,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            users: RwLock::default(),
            vehicles: RwLock::default(),
            rides: RwLock::default(),
            next_ride_id: AtomicU64::new(1),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Returns false, leaving the existing user untouched,
    /// if the name is taken.
    pub fn register_user(&self, name: UserName, age: u32, sex: impl Into<String>) -> bool {
        let mut table = write(&self.users);
        if table.users.contains_key(&name) {
            warn!(user = %name, "user already exists");
            return false;
        }
        table.order.push(name.clone());
        table.users.insert(name.clone(), User::new(name, age, sex));
        true
    }

    /// Register a vehicle under an existing user.
    pub fn register_vehicle(
        &self,
        owner: &UserName,
        class: VehicleClass,
        plate: PlateNumber,
    ) -> VehicleRegistration {
        let mut users = write(&self.users);
        let Some(user) = users.users.get_mut(owner) else {
            warn!(user = %owner, "user not registered, add the user first");
            return VehicleRegistration::UnknownOwner;
        };

        let mut vehicles = write(&self.vehicles);
        let vehicle = Vehicle::new(owner.clone(), class, plate);
        let id = vehicle.id.clone();
        if vehicles.contains_key(&id) {
            warn!(vehicle = %id, "vehicle already added");
            return VehicleRegistration::Duplicate(id);
        }

        vehicles.insert(id.clone(), vehicle);
        user.add_vehicle(id.clone());
        VehicleRegistration::Registered(id)
    }

    /// A snapshot of a user.
    pub fn user(&self, name: &UserName) -> Option<User> {
        read(&self.users).users.get(name).cloned()
    }

    pub fn contains_user(&self, name: &UserName) -> bool {
        read(&self.users).users.contains_key(name)
    }

    /// Fail with `UnknownUser` unless `name` is registered.
    pub fn require_user(&self, name: &UserName) -> Result<(), DomainError> {
        if self.contains_user(name) {
            Ok(())
        } else {
            Err(DomainError::UnknownUser(name.clone()))
        }
    }

    /// A snapshot of a vehicle.
    pub fn vehicle(&self, id: &VehicleId) -> Option<Vehicle> {
        read(&self.vehicles).get(id).cloned()
    }

    /// Allocate a ride id and make it the vehicle's active ride.
    ///
    /// Fails if the vehicle is unknown or already carries a ride; no id is
    /// consumed in that case.
    pub fn claim_vehicle(&self, id: &VehicleId) -> Result<RideId, DomainError> {
        let mut vehicles = write(&self.vehicles);
        let vehicle = vehicles
            .get_mut(id)
            .ok_or_else(|| DomainError::UnknownVehicle(id.clone()))?;

        if let Some(active) = vehicle.active_ride() {
            return Err(DomainError::VehicleBusy {
                vehicle: id.clone(),
                ride: active,
            });
        }

        let ride = RideId(self.next_ride_id.fetch_add(1, Ordering::Relaxed));
        // Cannot fail: the vehicle was checked idle under the same lock.
        let _ = vehicle.claim(ride);
        Ok(ride)
    }

    /// Free the vehicle if `ride` is its active ride.
    pub fn release_vehicle(&self, id: &VehicleId, ride: RideId) {
        if let Some(vehicle) = write(&self.vehicles).get_mut(id) {
            vehicle.release(ride);
        }
    }

    pub fn insert_ride(&self, ride: Arc<Ride>) {
        write(&self.rides).insert(ride.id, ride);
    }

    pub fn ride(&self, id: RideId) -> Option<Arc<Ride>> {
        read(&self.rides).get(&id).cloned()
    }

    pub fn remove_ride(&self, id: RideId) -> Option<Arc<Ride>> {
        write(&self.rides).remove(&id)
    }

    /// Every live ride, ordered by id.
    pub fn rides(&self) -> Vec<Arc<Ride>> {
        let mut rides: Vec<Arc<Ride>> = read(&self.rides).values().cloned().collect();
        rides.sort_by_key(|ride| ride.id);
        rides
    }

    /// Number of live rides.
    pub fn ride_count(&self) -> usize {
        read(&self.rides).len()
    }

    /// Create a closure resolving ride ids, suitable for route selection.
    pub fn ride_lookup(&self) -> impl Fn(RideId) -> Option<Arc<Ride>> + '_ {
        |id| self.ride(id)
    }

    fn with_user<T>(
        &self,
        name: &UserName,
        f: impl FnOnce(&mut User) -> T,
    ) -> Result<T, DomainError> {
        let mut table = write(&self.users);
        let user = table
            .users
            .get_mut(name)
            .ok_or_else(|| DomainError::UnknownUser(name.clone()))?;
        Ok(f(user))
    }

    pub fn record_offer(&self, driver: &UserName, ride: RideId) -> Result<(), DomainError> {
        self.with_user(driver, |user| user.ride_offered(ride))
    }

    pub fn record_taken(&self, passenger: &UserName, ride: RideId) -> Result<(), DomainError> {
        self.with_user(passenger, |user| user.ride_taken(ride))
    }

    pub fn record_offer_ended(&self, driver: &UserName, ride: RideId) -> Result<(), DomainError> {
        self.with_user(driver, |user| user.offer_ended(ride))
    }

    /// Taken/offered counts per user, in registration order.
    pub fn stats(&self) -> Vec<UserStats> {
        let table = read(&self.users);
        table
            .order
            .iter()
            .filter_map(|name| table.users.get(name))
            .map(UserStats::from)
            .collect()
    }
}
