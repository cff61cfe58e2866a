//! Maps geographic coordinates onto a padded SVG viewport.

use crate::catalogue::Coordinates;
use crate::geo;

/// A projected (already in screen space) 2-D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub struct Projector {
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
    padding: f64,
}

impl Projector {
    /// `points` is the multiset of every coordinate touched by any
    /// registered bus's route. Zoom is the minimum of the x/y scale
    /// factors that keep the extent inside `width x height` minus
    /// `padding` on every side; zero if the extent is degenerate in both
    /// axes.
    pub fn new(points: impl Iterator<Item = Coordinates>, width: f64, height: f64, padding: f64) -> Self {
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;

        let mut any = false;
        for point in points {
            any = true;
            min_lon = min_lon.min(point.longitude);
            max_lon = max_lon.max(point.longitude);
            min_lat = min_lat.min(point.latitude);
            max_lat = max_lat.max(point.latitude);
        }

        if !any {
            return Self { min_lon: 0.0, max_lat: 0.0, zoom: 0.0, padding };
        }

        let lon_span = max_lon - min_lon;
        let lat_span = max_lat - min_lat;

        let zoom_x = if !geo::is_zero(lon_span) { Some((width - 2.0 * padding) / lon_span) } else { None };
        let zoom_y = if !geo::is_zero(lat_span) { Some((height - 2.0 * padding) / lat_span) } else { None };

        let zoom = match (zoom_x, zoom_y) {
            (Some(x), Some(y)) => x.min(y),
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => 0.0,
        };

        Self { min_lon, max_lat, zoom, padding }
    }

    pub fn project(&self, coords: Coordinates) -> Point {
        Point {
            x: (coords.longitude - self.min_lon) * self.zoom + self.padding,
            y: (self.max_lat - coords.latitude) * self.zoom + self.padding,
        }
    }
}
