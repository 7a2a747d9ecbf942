//! Great-circle distance between position samples.

use track_transport::PositionSample;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance between two samples, in meters.
///
/// The original map view compared raw degree deltas against a 0.0001°
/// threshold, which is latitude-dependent; distances here are true
/// great-circle meters so the follow gate's threshold means what it says.
pub fn haversine_distance_m(a: PositionSample, b: PositionSample) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
