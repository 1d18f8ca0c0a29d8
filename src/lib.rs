//! Waste hotspot clustering and collection route planning
//!
//! Geotagged severity reports go through the [`cluster`] engine, which groups
//! them into hotspots with aggregate statistics. A subset of those hotspots
//! can then be ordered into a collection [`route`]. Both steps are pure
//! functions of their inputs and configuration and measure every distance
//! with the haversine formula in [`geo`].

pub mod cluster;
pub mod error;
pub mod geo;
pub mod route;

pub use cluster::{Cluster, ClusterConfig, ClusterMethod, Clustering, Priority, cluster};
pub use error::{ConfigError, RouteError};
pub use geo::{Coordinate, Point};
pub use route::{Route, RouteConfig, RouteNode, optimize_route, route_for_clusters};
