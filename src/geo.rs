//! Great-circle distance between two points on the Earth's surface.

use crate::catalogue::Coordinates;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const EPSILON: f64 = 1e-6;

/// Spherical law of cosines. Returns 0 when the two points coincide.
pub fn distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let lng_diff = (from.longitude - to.longitude).abs().to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * lng_diff.cos();
    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_METERS
}

pub(crate) fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
