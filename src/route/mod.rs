//! Route optimizer: visiting order across cluster centroids
//!
//! Nearest-neighbor construction followed by a single first-improvement 2-opt
//! pass, so the cost stays O(n²) and the result is never longer than the
//! greedy baseline.
pub mod matrix;
pub mod optimizer;
pub mod timing;
pub mod two_opt;

#[cfg(test)]
mod optimizer_test;

pub use matrix::DistanceMatrix;
pub use optimizer::{
    DEFAULT_MAX_STOPS, Route, RouteConfig, RouteNode, RouteStop, START_ID, TWO_OPT_MIN_NODES,
    optimize_route, optimize_route_with, route_for_clusters, select_stops,
};
pub use timing::{
    DEFAULT_SPEED_KMH, Leg, RouteTiming, TimingConfig, plan_timing, service_minutes_for,
    travel_minutes,
};
pub use two_opt::{MIN_GAIN_M, nearest_neighbor, two_opt_pass};
