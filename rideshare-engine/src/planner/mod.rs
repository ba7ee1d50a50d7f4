//! Multi-hop itinerary search.
//!
//! When no single ride covers a request, the planner looks for a chain of
//! routes through intermediate stops. The route index acts as the graph:
//! an edge exists wherever a route still has enough seats in total.

mod search;

pub use search::{PathRequest, PathSearch, Planner, RouteGraph, find_path};
