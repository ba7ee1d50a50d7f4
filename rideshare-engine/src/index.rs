//! Route index: origin/destination pairs to their class buckets.
//!
//! Entries are created on the first offer for a pair and evicted once the
//! last ride on the pair has ended. The index doubles as the adjacency
//! structure of the route graph, listing destinations per origin in the
//! order their routes were first offered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::domain::{DomainError, Location, Ride, RideId, Route, UserName};
use crate::matching::{Preference, RouteQueue};
use crate::planner::RouteGraph;

#[derive(Debug, Default)]
struct IndexInner {
    routes: HashMap<Route, Arc<Mutex<RouteQueue>>>,
    adjacency: HashMap<Location, Vec<Location>>,
}

/// Thread-safe index of live routes.
///
/// Each route entry has its own lock, so requests on different routes never
/// contend. The outer lock is only taken for writing when an entry is
/// created or evicted.
#[derive(Debug, Default)]
pub struct RouteIndex {
    inner: RwLock<IndexInner>,
}

fn lock(entry: &Mutex<RouteQueue>) -> MutexGuard<'_, RouteQueue> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RouteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the entry for `route`, if there is one.
    fn with_route<T>(&self, route: &Route, f: impl FnOnce(&mut RouteQueue) -> T) -> Option<T> {
        let inner = self.read();
        let entry = inner.routes.get(route)?;
        let mut queue = lock(entry);
        Some(f(&mut queue))
    }

    /// Add a freshly offered ride to its route, creating the entry if needed.
    pub fn insert(&self, ride: &Ride) {
        if self.with_route(&ride.route, |queue| queue.insert(ride)).is_some() {
            return;
        }

        let mut guard = self.write();
        let inner = &mut *guard;
        if !inner.routes.contains_key(&ride.route) {
            debug!(route = %ride.route, "creating route entry");
            inner
                .adjacency
                .entry(ride.route.origin.clone())
                .or_default()
                .push(ride.route.destination.clone());
            inner
                .routes
                .insert(ride.route.clone(), Arc::new(Mutex::new(RouteQueue::new())));
        }
        if let Some(entry) = inner.routes.get(&ride.route) {
            lock(entry).insert(ride);
        }
    }

    /// Serve a request from the route's buckets.
    ///
    /// An unknown route is a soft failure, like any other missing match.
    pub fn select<F>(
        &self,
        route: &Route,
        passenger: &UserName,
        seats: u32,
        preference: &Preference,
        rides: F,
    ) -> Result<Option<RideId>, DomainError>
    where
        F: Fn(RideId) -> Option<Arc<Ride>>,
    {
        match self.with_route(route, |queue| queue.select(passenger, seats, preference, rides)) {
            Some(result) => result,
            None => {
                debug!(route = %route, "no ride offered on route");
                Ok(None)
            }
        }
    }

    /// Remove a ride with no bookings from its route.
    ///
    /// Evicts the route entry if this was its last ride.
    pub fn remove(&self, ride: &Ride) -> Result<(), DomainError> {
        let emptied = self
            .with_route(&ride.route, |queue| {
                queue.remove(ride).map(|()| queue.is_empty())
            })
            .ok_or(DomainError::UnknownRide(ride.id))??;

        if emptied {
            self.evict_if_empty(&ride.route);
        }
        Ok(())
    }

    fn evict_if_empty(&self, route: &Route) {
        let mut guard = self.write();
        let inner = &mut *guard;

        let empty = inner
            .routes
            .get(route)
            .is_some_and(|entry| lock(entry).is_empty());
        if !empty {
            return;
        }

        inner.routes.remove(route);
        if let Some(destinations) = inner.adjacency.get_mut(&route.origin) {
            destinations.retain(|d| *d != route.destination);
            if destinations.is_empty() {
                inner.adjacency.remove(&route.origin);
            }
        }
        debug!(route = %route, "evicted empty route entry");
    }

    /// True iff the route exists and has at least `seats` free in total.
    pub fn feasible(&self, route: &Route, seats: u32) -> bool {
        self.with_route(route, |queue| queue.feasible(seats))
            .unwrap_or(false)
    }

    /// Aggregate free seats on a route.
    pub fn available_seats(&self, route: &Route) -> Option<u64> {
        self.with_route(route, |queue| queue.available_seats())
    }

    /// Rides registered on a route.
    pub fn total_rides(&self, route: &Route) -> Option<usize> {
        self.with_route(route, |queue| queue.total_rides())
    }

    pub fn contains(&self, route: &Route) -> bool {
        self.read().routes.contains_key(route)
    }

    /// Destinations with a route entry from `origin`, in first-offer order.
    pub fn destinations_from(&self, origin: &Location) -> Vec<Location> {
        self.read()
            .adjacency
            .get(origin)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of route entries.
    pub fn len(&self) -> usize {
        self.read().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().routes.is_empty()
    }
}

impl RouteGraph for RouteIndex {
    fn neighbours(&self, from: &Location) -> Vec<Location> {
        self.destinations_from(from)
    }

    fn feasible(&self, route: &Route, seats: u32) -> bool {
        RouteIndex::feasible(self, route, seats)
    }
}
