//! Leg-by-leg travel times for a computed route

use super::optimizer::{Route, RouteStop, START_ID};
use crate::error::{RouteError, RouteResult};
use crate::geo::Coordinate;

/// Default collection vehicle speed in km/h
pub const DEFAULT_SPEED_KMH: f64 = 25.0;

/// Service time per report in a cluster, in minutes
pub const SERVICE_MINUTES_PER_POINT: u32 = 5;

/// Upper bound on the service time of one stop, in minutes
pub const MAX_SERVICE_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct TimingConfig {
    pub speed_kmh: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// One traversed leg
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub distance_m: f64,
    /// Whole minutes of driving, truncated
    pub travel_minutes: u32,
    /// Minutes from departure until arrival at `to`
    pub cumulative_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteTiming {
    pub legs: Vec<Leg>,
    pub total_distance_m: f64,
    /// Driving plus service at every stop, in minutes
    pub total_minutes: u32,
}

/// Service time for a cluster of `count` reports: five minutes each, at most thirty
pub fn service_minutes_for(count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count
        .saturating_mul(SERVICE_MINUTES_PER_POINT)
        .min(MAX_SERVICE_MINUTES)
}

/// Whole minutes needed to drive `distance_m` at `speed_kmh`
pub fn travel_minutes(distance_m: f64, speed_kmh: f64) -> u32 {
    if distance_m <= 0.0 {
        return 0;
    }
    let hours = distance_m / 1000.0 / speed_kmh;
    (hours * 60.0) as u32
}

/// Lays out the legs of `route` with arrival times
///
/// `service` gives the minutes spent at each stop; it is added after arriving
/// and before leaving. The start leg is included when `route.start` is set,
/// which [`optimize_route`](super::optimize_route) records from its `start`
/// argument.
///
/// # Errors
///
/// [`RouteError::Speed`] when `config.speed_kmh` is not a positive finite number.
pub fn plan_timing<F>(route: &Route, config: &TimingConfig, service: F) -> RouteResult<RouteTiming>
where
    F: Fn(&RouteStop) -> u32,
{
    if !config.speed_kmh.is_finite() || config.speed_kmh <= 0.0 {
        return Err(RouteError::Speed(config.speed_kmh));
    }

    let mut legs = Vec::with_capacity(route.nodes.len());
    let mut elapsed: u32 = 0;
    let mut distance = 0.0;

    let mut previous: Option<(&str, Coordinate)> =
        route.start.map(|s| (START_ID, s));

    for stop in &route.nodes {
        if let Some((from, at)) = previous {
            let distance_m = at.distance_m(&stop.coordinate());
            let minutes = travel_minutes(distance_m, config.speed_kmh);
            elapsed = elapsed.saturating_add(minutes);
            distance += distance_m;
            legs.push(Leg {
                from: from.to_string(),
                to: stop.id.clone(),
                distance_m,
                travel_minutes: minutes,
                cumulative_minutes: elapsed,
            });
        }
        elapsed = elapsed.saturating_add(service(stop));
        previous = Some((stop.id.as_str(), stop.coordinate()));
    }

    Ok(RouteTiming {
        legs,
        total_distance_m: distance,
        total_minutes: elapsed,
    })
}
