//! Hotspot clustering and route planning tool
//!
//! Reads geotagged severity reports from CSV, groups them into hotspot
//! clusters and optionally orders a subset of the clusters into a collection
//! route. Results are written as CSV to a file or stdout.

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotspot_planner::cluster::{self, Cluster, ClusterConfig, ClusterMethod, alert_candidates, summarize};
use hotspot_planner::geo::{Coordinate, Point};
use hotspot_planner::route::{
    self, Route, RouteConfig, RouteTiming, TimingConfig, plan_timing, service_minutes_for,
};


#[derive(Parser)]
#[command(name = "hotspot_planner")]
#[command(about = "Waste hotspot clustering and collection route planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Group reports into hotspot clusters
    Cluster(ClusterArgs),
    /// Cluster reports, then order clusters into a collection route
    Route(RouteArgs),
}

#[derive(Args)]
struct ClusterArgs {
    /// Input CSV file with id,lat,lng,severity,timestamp columns
    #[arg(short, long, default_value = "points.csv")]
    input: PathBuf,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    clustering: ClusteringArgs,
}

#[derive(Args)]
struct RouteArgs {
    /// Input CSV file with id,lat,lng,severity,timestamp columns
    #[arg(short, long, default_value = "points.csv")]
    input: PathBuf,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vehicle start position as LAT,LNG
    #[arg(short, long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    start: Option<Coordinate>,

    /// Cluster ids to visit (default: the most severe clusters)
    #[arg(short, long, value_delimiter = ',')]
    clusters: Vec<String>,

    /// Number of clusters visited when no ids are given
    #[arg(long, default_value_t = route::DEFAULT_MAX_STOPS)]
    max_stops: usize,

    /// Skip the 2-opt improvement pass
    #[arg(long)]
    no_two_opt: bool,

    /// Vehicle speed in km/h, used for travel times
    #[arg(long, default_value_t = route::DEFAULT_SPEED_KMH)]
    speed_kmh: f64,

    #[command(flatten)]
    clustering: ClusteringArgs,
}

#[derive(Args)]
struct ClusteringArgs {
    /// Clustering method
    #[arg(long, value_enum, default_value_t = MethodArg::Density)]
    method: MethodArg,

    /// Density radius in meters
    #[arg(short, long, default_value_t = cluster::DEFAULT_EPS_M)]
    eps_m: f64,

    /// Minimum reports in a density neighbourhood
    #[arg(short = 'm', long, default_value_t = cluster::DEFAULT_MIN_POINTS)]
    min_points: usize,

    /// Number of centroids for the centroid method
    #[arg(short, long)]
    k: Option<usize>,

    /// Seed for centroid initialisation
    #[arg(long, default_value_t = cluster::DEFAULT_SEED)]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Density,
    Centroid,
}

impl ClusteringArgs {
    fn config(&self) -> ClusterConfig {
        ClusterConfig {
            method: match self.method {
                MethodArg::Density => ClusterMethod::Density,
                MethodArg::Centroid => ClusterMethod::Centroid,
            },
            eps_m: self.eps_m,
            min_points: self.min_points,
            k_hint: self.k,
            seed: self.seed,
            ..Default::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match &cli.command {
        Command::Cluster(args) => run_cluster(args),
        Command::Route(args) => run_route(args),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so CSV on stdout stays clean; `RUST_LOG` overrides the level
fn init_tracing(debug: bool) {
    let default = if debug { "hotspot_planner=debug" } else { "hotspot_planner=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_cluster(args: &ClusterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clusters = load_and_cluster(&args.input, &args.clustering)?;

    let summary = summarize(&clusters);
    tracing::info!(
        clusters = summary.total_clusters,
        points = summary.total_points,
        avg_size = summary.avg_cluster_size,
        critical = summary.critical,
        high = summary.high,
        alerts = alert_candidates(&clusters, cluster::DEFAULT_ALERT_THRESHOLD).len(),
        "clustering done"
    );

    let out = open_output(args.output.as_deref())?;
    write_clusters(out, &clusters)?;
    if let Some(path) = &args.output {
        tracing::info!("clusters written to {}", path.display());
    }
    Ok(())
}

fn run_route(args: &RouteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clusters = load_and_cluster(&args.input, &args.clustering)?;

    let ids: Vec<String> = if args.clusters.is_empty() {
        route::select_stops(&clusters, args.max_stops)
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    } else {
        args.clusters.clone()
    };

    let config = RouteConfig {
        two_opt: !args.no_two_opt,
    };
    let planned = route::route_for_clusters(&clusters, &ids, args.start, &config)?;

    let counts: HashMap<&str, usize> = clusters.iter().map(|c| (c.id.as_str(), c.count)).collect();
    let timing = plan_timing(
        &planned,
        &TimingConfig {
            speed_kmh: args.speed_kmh,
        },
        |stop| service_minutes_for(counts.get(stop.id.as_str()).copied().unwrap_or(1)),
    )?;

    tracing::info!(
        stops = planned.nodes.len(),
        distance_km = planned.total_distance_m / 1000.0,
        minutes = timing.total_minutes,
        "route planned"
    );

    let out = open_output(args.output.as_deref())?;
    write_route(out, &planned, &timing)?;
    Ok(())
}

fn load_and_cluster(
    input: &Path,
    args: &ClusteringArgs,
) -> Result<Vec<Cluster>, Box<dyn std::error::Error>> {
    let config = args.config();
    config.validate()?;

    let (points, unreadable) = read_points(input)?;
    tracing::debug!("read {} points from {}", points.len(), input.display());
    if unreadable > 0 {
        tracing::warn!("{unreadable} rows could not be parsed and were skipped");
    }

    let result = cluster::cluster(&points, &config)?;
    if !result.skipped.is_empty() {
        tracing::warn!("{} points failed validation and were skipped", result.skipped.len());
    }
    Ok(result.clusters)
}

/// Raw CSV row; timestamps are parsed separately to accept naive values
#[derive(Deserialize)]
struct PointRecord {
    id: String,
    lat: f64,
    lng: f64,
    severity: u8,
    timestamp: String,
}

/// Reads points from a CSV file with a header row
///
/// Expected columns: `id,lat,lng,severity,timestamp`
///
/// # Returns
///
/// A tuple `(points, unreadable)` where `unreadable` counts rows that could
/// not be parsed.
fn read_points(path: &Path) -> Result<(Vec<Point>, usize), Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut points = Vec::new();
    let mut unreadable = 0;
    for (row, result) in reader.deserialize::<PointRecord>().enumerate() {
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|r| parse_timestamp(&r.timestamp).map(|ts| (r, ts)));
        match parsed {
            Ok((r, timestamp)) => points.push(Point::new(r.id, r.lat, r.lng, r.severity, timestamp)),
            Err(e) => {
                tracing::debug!(row = row + 1, "unreadable row: {e}");
                unreadable += 1;
            }
        }
    }

    Ok((points, unreadable))
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {s:?}: {e}"))
}

/// Parses `LAT,LNG`
fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("invalid latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("invalid longitude: {e}"))?;
    let c = Coordinate::new(lat, lng);
    if !c.is_valid() {
        return Err(format!("coordinate {c} out of range"));
    }
    Ok(c)
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(File::create(p)?),
        None => Box::new(io::stdout().lock()),
    })
}

/// Writes one row per cluster
///
/// Columns: `id,lat,lng,severity,count,radius_m,priority,members` with member
/// ids joined by `;`.
fn write_clusters<W: Write>(out: W, clusters: &[Cluster]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(["id", "lat", "lng", "severity", "count", "radius_m", "priority", "members"])?;

    for c in clusters {
        let members: Vec<&str> = c.members.iter().map(|p| p.id.as_str()).collect();
        writer.write_record([
            c.id.clone(),
            format!("{:.6}", c.centroid.lat),
            format!("{:.6}", c.centroid.lng),
            c.severity.to_string(),
            c.count.to_string(),
            format!("{:.1}", c.radius_m),
            c.priority.to_string(),
            members.join(";"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes one row per stop in visiting order
///
/// Columns: `order,id,lat,lng,leg_distance_m,cumulative_minutes`. The first
/// stop of a route without a start has an empty leg.
fn write_route<W: Write>(
    out: W,
    route: &Route,
    timing: &RouteTiming,
) -> Result<(), Box<dyn std::error::Error>> {
    let arrivals: HashMap<&str, _> = timing.legs.iter().map(|l| (l.to.as_str(), l)).collect();

    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(["order", "id", "lat", "lng", "leg_distance_m", "cumulative_minutes"])?;

    for stop in &route.nodes {
        let (distance, minutes) = match arrivals.get(stop.id.as_str()) {
            Some(leg) => (format!("{:.1}", leg.distance_m), leg.cumulative_minutes.to_string()),
            None => ("0.0".to_string(), "0".to_string()),
        };
        writer.write_record([
            stop.order.to_string(),
            stop.id.clone(),
            format!("{:.6}", stop.lat),
            format!("{:.6}", stop.lng),
            distance,
            minutes,
        ])?;
    }

    writer.flush()?;
    Ok(())
}
