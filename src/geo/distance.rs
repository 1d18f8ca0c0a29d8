use std::f64::consts::PI;

use super::point::Coordinate;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Mean Earth radius in meters
pub const EARTH_R: f64 = 6_371_000.0;

/// Slack added to window half-widths so rounding never drops a point lying
/// exactly on the radius
const WINDOW_SLACK_DEG: f64 = 1e-9;

/// Calculates the haversine great-circle distance between two coordinates
///
/// # Returns
///
/// Distance in meters. Zero for identical coordinates.
pub fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat) * DEGREE_RAD;
    let d_lng = (b.lng - a.lng) * DEGREE_RAD;

    let lat1 = a.lat * DEGREE_RAD;
    let lat2 = b.lat * DEGREE_RAD;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_R * h.min(1.0).sqrt().asin()
}

/// Latitude and longitude half-widths (degrees) of a box enclosing every
/// point within `radius_m` of `center`
///
/// The box is conservative: everything inside the haversine radius is inside
/// the box, not the reverse. When the circle reaches a pole the longitude
/// half-width saturates at 180 degrees, meaning "any longitude".
///
/// See <http://janmatuschek.de/LatitudeLongitudeBoundingCoordinates>
pub fn degree_window(center: &Coordinate, radius_m: f64) -> (f64, f64) {
    let angular = radius_m / EARTH_R;
    let d_lat = angular / DEGREE_RAD + WINDOW_SLACK_DEG;

    let reaches_pole = center.lat.abs() + d_lat >= 90.0;
    let ratio = angular.sin() / (center.lat * DEGREE_RAD).cos();

    let d_lng = if reaches_pole || angular >= PI / 2.0 || ratio >= 1.0 {
        180.0
    } else {
        (ratio.asin() / DEGREE_RAD + WINDOW_SLACK_DEG).min(180.0)
    };

    (d_lat, d_lng)
}

/// Sum of consecutive haversine legs along `path`
pub fn path_length(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine(&w[0], &w[1])).sum()
}
