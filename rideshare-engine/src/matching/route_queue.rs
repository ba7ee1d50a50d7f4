//! Per-route class buckets and the selection policy.
//!
//! A `RouteQueue` holds every live ride for one origin/destination pair,
//! bucketed by vehicle class, together with running totals that allow a
//! request to be rejected before any bucket is looked at.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::queue::{RideQueue, SeatKey};
use crate::domain::{DomainError, Ride, RideId, UserName, VehicleClass};

/// How a passenger wants their ride chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    /// Pick the class holding the single most vacant ride.
    pub most_vacant: bool,

    /// Explicit class; overrides `most_vacant` when set.
    pub preferred_class: Option<VehicleClass>,
}

impl Preference {
    /// Most-vacant selection with no class preference.
    pub fn most_vacant() -> Self {
        Self {
            most_vacant: true,
            preferred_class: None,
        }
    }

    /// Selection restricted to one vehicle class.
    pub fn class(class: VehicleClass) -> Self {
        Self {
            most_vacant: false,
            preferred_class: Some(class),
        }
    }
}

impl Default for Preference {
    fn default() -> Self {
        Self::most_vacant()
    }
}

/// All class buckets of one route plus aggregate counters.
///
/// `total_rides` counts rides registered on the route, including fully
/// booked ones that have left their bucket. `total_available_seats` is
/// always the sum of the seats held in the buckets.
#[derive(Debug, Default)]
pub struct RouteQueue {
    buckets: HashMap<VehicleClass, RideQueue>,
    total_rides: usize,
    total_available_seats: u64,
}

impl RouteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ride at its current seat count.
    pub fn insert(&mut self, ride: &Ride) {
        let seats = ride.available_seats();
        if seats > 0 {
            self.buckets
                .entry(ride.class.clone())
                .or_default()
                .push(SeatKey::new(seats, ride.id));
        }
        self.total_rides += 1;
        self.total_available_seats += u64::from(seats);
    }

    /// Resolve which class bucket a request should be served from.
    ///
    /// An explicit class always wins. Otherwise, under the most-vacant
    /// policy, the class whose top ride has the most seats is chosen; if
    /// even that ride cannot seat the request, nothing is resolved and no
    /// other class is tried.
    pub fn resolve_class(&self, seats: u32, preference: &Preference) -> Option<VehicleClass> {
        if let Some(class) = &preference.preferred_class {
            return Some(class.clone());
        }
        if !preference.most_vacant {
            return None;
        }

        let (class, top) = self
            .buckets
            .iter()
            .filter_map(|(class, bucket)| bucket.peek_max().map(|top| (class, top)))
            .max_by_key(|(_, top)| *top)?;

        if top.seats < seats {
            debug!(
                class = %class,
                best_seats = top.seats,
                requested = seats,
                "most vacant ride too small"
            );
            return None;
        }
        Some(class.clone())
    }

    /// Book `seats` for `passenger` on the best matching ride.
    ///
    /// `rides` looks up the ride behind a bucket entry. Returns `Ok(None)`
    /// when no ride fits; in that case nothing has been mutated.
    pub fn select<F>(
        &mut self,
        passenger: &UserName,
        seats: u32,
        preference: &Preference,
        rides: F,
    ) -> Result<Option<RideId>, DomainError>
    where
        F: Fn(RideId) -> Option<Arc<Ride>>,
    {
        if self.total_available_seats < u64::from(seats) {
            return Ok(None);
        }

        let Some(class) = self.resolve_class(seats, preference) else {
            return Ok(None);
        };

        let Some(bucket) = self.buckets.get_mut(&class) else {
            debug!(class = %class, "preferred vehicle class not available");
            return Ok(None);
        };

        let top = match bucket.peek_max() {
            Some(top) if top.seats >= seats => top,
            _ => return Ok(None),
        };

        let ride = rides(top.ride).ok_or(DomainError::UnknownRide(top.ride))?;
        let left = ride.book(passenger.clone(), seats)?;

        bucket.replace_top(left);
        if bucket.is_empty() {
            self.buckets.remove(&class);
        }
        self.total_available_seats -= u64::from(seats);

        Ok(Some(top.ride))
    }

    /// Unregister a ride that has no bookings.
    ///
    /// The ride is located by its current seat count. A bucket left empty
    /// drops its class entry.
    pub fn remove(&mut self, ride: &Ride) -> Result<(), DomainError> {
        let bookings = ride.booking_count();
        if bookings > 0 {
            return Err(DomainError::RideHasBookings {
                ride: ride.id,
                bookings,
            });
        }

        let seats = ride.available_seats();
        let bucket = self
            .buckets
            .get_mut(&ride.class)
            .ok_or(DomainError::UnknownRide(ride.id))?;
        if !bucket.remove(SeatKey::new(seats, ride.id)) {
            return Err(DomainError::UnknownRide(ride.id));
        }
        if bucket.is_empty() {
            self.buckets.remove(&ride.class);
        }

        self.total_rides -= 1;
        self.total_available_seats -= u64::from(seats);
        Ok(())
    }

    /// Rides registered on this route.
    pub fn total_rides(&self) -> usize {
        self.total_rides
    }

    /// Seats free across all classes.
    pub fn available_seats(&self) -> u64 {
        self.total_available_seats
    }

    /// Cheap capacity check: could any ride possibly seat the request?
    pub fn feasible(&self, seats: u32) -> bool {
        self.total_available_seats >= u64::from(seats)
    }

    /// True when the route holds no rides at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty() && self.total_rides == 0
    }

    /// The bucket for `class`, if any ride of that class has free seats.
    pub fn bucket(&self, class: &VehicleClass) -> Option<&RideQueue> {
        self.buckets.get(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &VehicleClass> {
        self.buckets.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, PlateNumber, Route, VehicleId};

    /// Rides indexed by id, standing in for the registry.
    struct Rides(HashMap<RideId, Arc<Ride>>);

    impl Rides {
        fn new() -> Self {
            Self(HashMap::new())
        }

        fn offer(&mut self, queue: &mut RouteQueue, id: u64, class: &str, seats: u32) -> Arc<Ride> {
            let driver = UserName::new(format!("driver{id}")).unwrap();
            let class = VehicleClass::new(class).unwrap();
            let vehicle = VehicleId::derive(&driver, &class, &PlateNumber::new("P").unwrap());
            let route = Route::new(
                Location::new("Bangalore").unwrap(),
                Location::new("Mysore").unwrap(),
            );
            let ride = Arc::new(Ride::new(RideId(id), driver, route, vehicle, class, seats));
            queue.insert(&ride);
            self.0.insert(ride.id, ride.clone());
            ride
        }

        fn lookup(&self) -> impl Fn(RideId) -> Option<Arc<Ride>> + '_ {
            |id| self.0.get(&id).cloned()
        }
    }

    fn user(s: &str) -> UserName {
        UserName::new(s).unwrap()
    }

    fn class(s: &str) -> VehicleClass {
        VehicleClass::new(s).unwrap()
    }

    #[test]
    fn insert_updates_aggregates() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 1, "Swift", 1);
        rides.offer(&mut q, 2, "Polo", 2);
        rides.offer(&mut q, 3, "Polo", 3);

        assert_eq!(q.total_rides(), 3);
        assert_eq!(q.available_seats(), 6);
        assert_eq!(q.bucket(&class("Polo")).unwrap().len(), 2);
        assert!(q.feasible(6));
        assert!(!q.feasible(7));
    }

    #[test]
    fn most_vacant_picks_largest_class_top() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 1, "Swift", 1);
        let polo = rides.offer(&mut q, 2, "Polo", 2);

        let picked = q
            .select(&user("Nandini"), 1, &Preference::most_vacant(), rides.lookup())
            .unwrap();
        assert_eq!(picked, Some(RideId(2)));
        assert_eq!(polo.available_seats(), 1);
        assert_eq!(q.available_seats(), 2);
    }

    #[test]
    fn most_vacant_has_no_fallback() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        // Two 1-seat rides sum to 2, so the aggregate check passes, but the
        // best single ride cannot seat 2.
        rides.offer(&mut q, 1, "Swift", 1);
        rides.offer(&mut q, 2, "Activa", 1);

        let picked = q
            .select(&user("Gaurav"), 2, &Preference::most_vacant(), rides.lookup())
            .unwrap();
        assert_eq!(picked, None);
        assert_eq!(q.available_seats(), 2);
    }

    #[test]
    fn most_vacant_ignores_class_that_could_fit_when_not_global_max() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 1, "XUV", 2);
        rides.offer(&mut q, 2, "Polo", 1);

        // XUV has the global max and fits; Polo is never considered.
        let picked = q
            .select(&user("Rahul"), 1, &Preference::most_vacant(), rides.lookup())
            .unwrap();
        assert_eq!(picked, Some(RideId(1)));
    }

    #[test]
    fn class_tie_goes_to_earliest_ride() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 6, "Swift", 1);
        rides.offer(&mut q, 4, "Baleno", 1);

        assert_eq!(
            q.resolve_class(1, &Preference::most_vacant()),
            Some(class("Baleno"))
        );
    }

    #[test]
    fn explicit_class_overrides_most_vacant() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        let activa = rides.offer(&mut q, 2, "Activa", 1);
        rides.offer(&mut q, 3, "Polo", 2);

        let preference = Preference {
            most_vacant: true,
            preferred_class: Some(class("Activa")),
        };
        let picked = q
            .select(&user("Gaurav"), 1, &preference, rides.lookup())
            .unwrap();
        assert_eq!(picked, Some(RideId(2)));
        assert_eq!(activa.available_seats(), 0);
        // Exhausted bucket drops its class, but the ride stays registered
        assert!(q.bucket(&class("Activa")).is_none());
        assert_eq!(q.total_rides(), 2);
    }

    #[test]
    fn unknown_class_is_soft_failure() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 4, "Baleno", 2);

        let picked = q
            .select(&user("Shashank"), 1, &Preference::class(class("Polo")), rides.lookup())
            .unwrap();
        assert_eq!(picked, None);
        assert_eq!(q.available_seats(), 2);
    }

    #[test]
    fn no_preference_without_most_vacant_resolves_nothing() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 1, "Swift", 2);

        let preference = Preference {
            most_vacant: false,
            preferred_class: None,
        };
        assert_eq!(
            q.select(&user("Gaurav"), 1, &preference, rides.lookup()).unwrap(),
            None
        );
    }

    #[test]
    fn aggregate_rejects_before_lookup() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 1, "Swift", 1);

        // Empty lookup: would error if a ride were consulted
        let picked = q
            .select(&user("Gaurav"), 2, &Preference::most_vacant(), |_| None)
            .unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn missing_ride_is_hard_error() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        rides.offer(&mut q, 1, "Swift", 1);

        let err = q
            .select(&user("Gaurav"), 1, &Preference::most_vacant(), |_| None)
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownRide(RideId(1)));
        assert_eq!(q.available_seats(), 1);
    }

    #[test]
    fn remove_after_partial_booking_uses_current_seats() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        let ride = rides.offer(&mut q, 1, "XUV", 5);
        rides.offer(&mut q, 2, "XUV", 1);

        // Booked ride cannot be removed
        q.select(&user("Rohan"), 1, &Preference::most_vacant(), rides.lookup())
            .unwrap();
        assert_eq!(
            q.remove(&ride).unwrap_err(),
            DomainError::RideHasBookings {
                ride: RideId(1),
                bookings: 1
            }
        );
        assert_eq!(q.total_rides(), 2);

        let idle = rides.0[&RideId(2)].clone();
        q.remove(&idle).unwrap();
        assert_eq!(q.total_rides(), 1);
        assert_eq!(q.available_seats(), 4);
    }

    #[test]
    fn remove_last_ride_empties_route() {
        let mut q = RouteQueue::new();
        let mut rides = Rides::new();
        let ride = rides.offer(&mut q, 1, "Swift", 1);

        q.remove(&ride).unwrap();
        assert!(q.is_empty());
        assert_eq!(q.classes().count(), 0);
        assert_eq!(q.remove(&ride).unwrap_err(), DomainError::UnknownRide(RideId(1)));
    }
}
