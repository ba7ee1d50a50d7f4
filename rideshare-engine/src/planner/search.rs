//! BFS path search over the route graph.
//!
//! Finds chains of routes from an origin to a destination where every hop
//! has enough aggregate capacity for the requested seats.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::domain::{Location, Route};
use crate::matching::MatchConfig;

/// Trait for providing the route graph.
///
/// This abstraction allows the planner to be tested without a live index.
pub trait RouteGraph {
    /// Destinations reachable from `from` by a single route, in a stable order.
    fn neighbours(&self, from: &Location) -> Vec<Location>;

    /// Whether `route` currently has at least `seats` free in total.
    fn feasible(&self, route: &Route, seats: u32) -> bool;
}

/// Request for a multi-hop path.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub origin: Location,
    pub destination: Location,
    pub seats: u32,
}

impl PathRequest {
    /// Create a new path request.
    pub fn new(origin: Location, destination: Location, seats: u32) -> Self {
        Self {
            origin,
            destination,
            seats,
        }
    }
}

/// Result of a path search.
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    /// Every completed path, in discovery order. Each path lists its stops
    /// from origin to destination.
    pub paths: Vec<Vec<Location>>,

    /// Number of partial paths taken off the frontier.
    pub routes_explored: usize,
}

impl PathSearch {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The first path discovered, which is also a shortest one.
    pub fn first(&self) -> Option<&[Location]> {
        self.paths.first().map(|p| p.as_slice())
    }

    /// Consume the result, keeping only the first path.
    pub fn into_first(self) -> Option<Vec<Location>> {
        self.paths.into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Path planner using BFS.
///
/// Stops are visited at most once: a stop reached again through another
/// path is not explored a second time, so cycles terminate but longer paths
/// through an already visited stop are never produced. The destination is
/// recorded from every predecessor that reaches it but is never expanded.
pub struct Planner<'a, G: RouteGraph> {
    graph: &'a G,
    config: &'a MatchConfig,
}

impl<'a, G: RouteGraph> Planner<'a, G> {
    /// Create a new planner.
    pub fn new(graph: &'a G, config: &'a MatchConfig) -> Self {
        Self { graph, config }
    }

    /// Search for every path the BFS discovers before its frontier runs dry.
    pub fn search(&self, request: &PathRequest) -> PathSearch {
        let mut result = PathSearch::empty();
        if request.origin == request.destination {
            return result;
        }

        let mut queue: VecDeque<Vec<Location>> = VecDeque::new();
        queue.push_back(vec![request.origin.clone()]);

        let mut visited: HashSet<Location> = HashSet::new();
        visited.insert(request.origin.clone());

        while let Some(path) = queue.pop_front() {
            result.routes_explored += 1;

            let Some(stop) = path.last().cloned() else {
                continue;
            };

            if let Some(max_hops) = self.config.max_hops {
                if path.len() > max_hops {
                    continue;
                }
            }

            for next in self.graph.neighbours(&stop) {
                let hop = Route::new(stop.clone(), next.clone());
                if !self.graph.feasible(&hop, request.seats) {
                    continue;
                }

                if next == request.destination {
                    let mut complete = path.clone();
                    complete.push(next);
                    trace!(hops = complete.len() - 1, "path completed");
                    result.paths.push(complete);
                    continue;
                }

                if !visited.insert(next.clone()) {
                    continue;
                }

                trace!(from = %stop, to = %next, "BFS exploring stop");
                let mut extended = path.clone();
                extended.push(next);
                queue.push_back(extended);
            }
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            paths = result.paths.len(),
            routes_explored = result.routes_explored,
            "path search complete"
        );

        result
    }
}

/// Find the first path from `origin` to `destination` with room for `seats`.
///
/// Returns the stops along the path, origin first, or an empty vector if
/// the destination cannot be reached.
pub fn find_path<G: RouteGraph>(
    graph: &G,
    config: &MatchConfig,
    origin: &Location,
    destination: &Location,
    seats: u32,
) -> Vec<Location> {
    let request = PathRequest::new(origin.clone(), destination.clone(), seats);
    Planner::new(graph, config)
        .search(&request)
        .into_first()
        .unwrap_or_default()
}
