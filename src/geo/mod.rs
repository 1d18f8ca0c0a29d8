//! Geographic primitives shared by the cluster engine and the route optimizer
//!
//! Every distance in the crate goes through [`haversine`], so cluster radii,
//! neighbourhood queries and route legs are measured in the same meters.
pub mod distance;
pub mod point;


pub use distance::{DEGREE_RAD, EARTH_R, degree_window, haversine, path_length};
pub use point::{Coordinate, MAX_SEVERITY, MIN_SEVERITY, Point, Rejection};
