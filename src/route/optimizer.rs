use std::collections::{HashMap, HashSet};

use super::matrix::DistanceMatrix;
use super::two_opt::{nearest_neighbor, two_opt_pass};
use crate::cluster::Cluster;
use crate::error::{RouteError, RouteResult};
use crate::geo::Coordinate;

/// Default cap on the number of clusters visited by one route
pub const DEFAULT_MAX_STOPS: usize = 10;

/// Fewest nodes for which the 2-opt pass runs
pub const TWO_OPT_MIN_NODES: usize = 4;

/// Id used for the start location in leg listings
pub const START_ID: &str = "start";

/// A location the route must visit
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl RouteNode {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

impl From<&Cluster> for RouteNode {
    fn from(c: &Cluster) -> Self {
        RouteNode::new(c.id.clone(), c.centroid.lat, c.centroid.lng)
    }
}

/// A visited node and its 0-based position in the route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub order: usize,
}

impl RouteStop {
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Ordered visiting plan
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    /// Where the vehicle sets off; not a stop itself
    pub start: Option<Coordinate>,
    pub nodes: Vec<RouteStop>,
    /// Sum of all legs, the start leg included, in meters
    pub total_distance_m: f64,
}

/// Knobs of the route optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    /// Run the single 2-opt pass after nearest-neighbor construction
    pub two_opt: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { two_opt: true }
    }
}

/// Orders `nodes` to approximately minimise travel distance from `start`
///
/// See [`optimize_route_with`].
pub fn optimize_route(nodes: &[RouteNode], start: Option<Coordinate>) -> RouteResult<Route> {
    optimize_route_with(nodes, start, &RouteConfig::default())
}

/// Orders `nodes` with nearest-neighbor construction and one 2-opt pass
///
/// With a `start`, the first leg runs from it to the closest node; without
/// one, the route begins at the first node. Ties are broken by input order.
///
/// # Errors
///
/// [`RouteError::DuplicateNode`] when two nodes share an id and
/// [`RouteError::InvalidCoordinate`] for a node or start outside the WGS-84
/// ranges.
pub fn optimize_route_with(
    nodes: &[RouteNode],
    start: Option<Coordinate>,
    config: &RouteConfig,
) -> RouteResult<Route> {
    validate(nodes, start)?;
    if nodes.is_empty() {
        return Ok(Route {
            start,
            ..Default::default()
        });
    }

    let n = nodes.len();
    let mut locations: Vec<Coordinate> = nodes.iter().map(RouteNode::coordinate).collect();
    locations.extend(start);
    let matrix = DistanceMatrix::new(&locations);
    let start_index = start.map(|_| n);

    let mut sequence = nearest_neighbor(&matrix, n, start_index);
    let baseline = matrix.sequence_length(&sequence);

    if config.two_opt && n >= TWO_OPT_MIN_NODES {
        let improvements = two_opt_pass(&matrix, &mut sequence);
        tracing::debug!(
            nodes = n,
            improvements,
            baseline_m = baseline,
            optimized_m = matrix.sequence_length(&sequence),
            "2-opt pass finished"
        );
    }

    let total_distance_m = matrix.sequence_length(&sequence);
    let stops = sequence
        .iter()
        .filter(|&&i| i < n)
        .enumerate()
        .map(|(order, &i)| RouteStop {
            id: nodes[i].id.clone(),
            lat: nodes[i].lat,
            lng: nodes[i].lng,
            order,
        })
        .collect();

    Ok(Route {
        start,
        nodes: stops,
        total_distance_m,
    })
}

/// Routes through the requested clusters' centroids
///
/// Ids repeated in `ids` are visited once.
///
/// # Errors
///
/// [`RouteError::UnknownCluster`] for an id that is not in `clusters`; no
/// partial route is produced.
pub fn route_for_clusters<S: AsRef<str>>(
    clusters: &[Cluster],
    ids: &[S],
    start: Option<Coordinate>,
    config: &RouteConfig,
) -> RouteResult<Route> {
    let by_id: HashMap<&str, &Cluster> = clusters.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        let cluster = by_id
            .get(id)
            .ok_or_else(|| RouteError::UnknownCluster(id.to_string()))?;
        if seen.insert(id) {
            nodes.push(RouteNode::from(*cluster));
        } else {
            tracing::debug!(id, "cluster requested twice, visiting once");
        }
    }

    optimize_route_with(&nodes, start, config)
}

/// The `max_stops` clusters with the highest single report severity
///
/// Clusters with equal severity keep their input order.
pub fn select_stops(clusters: &[Cluster], max_stops: usize) -> Vec<&Cluster> {
    let mut ranked: Vec<&Cluster> = clusters.iter().collect();
    ranked.sort_by(|a, b| b.max_severity.cmp(&a.max_severity));
    ranked.truncate(max_stops);
    ranked
}

fn validate(nodes: &[RouteNode], start: Option<Coordinate>) -> RouteResult<()> {
    if let Some(s) = start {
        if !s.is_valid() {
            return Err(RouteError::InvalidCoordinate {
                id: START_ID.to_string(),
                lat: s.lat,
                lng: s.lng,
            });
        }
    }

    let mut ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !node.coordinate().is_valid() {
            return Err(RouteError::InvalidCoordinate {
                id: node.id.clone(),
                lat: node.lat,
                lng: node.lng,
            });
        }
        if !ids.insert(node.id.as_str()) {
            return Err(RouteError::DuplicateNode(node.id.clone()));
        }
    }
    Ok(())
}
