//! Planar projection between geographic coordinates and grid cells.
//!
//! The grid lives on a spherical pseudo-Mercator plane (the Web Mercator
//! sphere), so cells are squares in projected meters and cell lookup is a
//! floor division. Distances for the reveal throttle are computed on the
//! sphere with the haversine formula via the `geo` crate.

use crate::cell::CellCoord;
use geo::{Distance, Haversine, Point};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Radius of the Web Mercator sphere (WGS84 semi-major axis) in meters.
pub const MERCATOR_RADIUS_METERS: f64 = 6_378_137.0;

/// Latitude bound of the Web Mercator projection, in degrees.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// Project a geographic point to planar meters.
///
/// Latitude is clamped to [`MAX_MERCATOR_LATITUDE`]; the projection diverges
/// at the poles.
pub fn project(point: &Point) -> (f64, f64) {
    let lat = point.y().clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let x = MERCATOR_RADIUS_METERS * point.x().to_radians();
    let y = MERCATOR_RADIUS_METERS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Inverse of [`project`]: planar meters back to a geographic point.
pub fn unproject(x: f64, y: f64) -> Point {
    let lon = (x / MERCATOR_RADIUS_METERS).to_degrees();
    let lat = (2.0 * (y / MERCATOR_RADIUS_METERS).exp().atan() - FRAC_PI_2).to_degrees();
    Point::new(lon, lat)
}

/// The fine cell containing `point` for the given cell edge length.
pub fn cell_containing(point: &Point, cell_meters: f64) -> CellCoord {
    let (x, y) = project(point);
    CellCoord::new(
        (x / cell_meters).floor() as i32,
        (y / cell_meters).floor() as i32,
    )
}

/// Geographic coordinate of the center of `cell` for the given cell edge
/// length.
pub fn cell_center(cell: CellCoord, cell_meters: f64) -> Point {
    unproject(
        (cell.x as f64 + 0.5) * cell_meters,
        (cell.y as f64 + 0.5) * cell_meters,
    )
}

/// Great-circle distance between two geographic points in meters.
pub fn distance_meters(a: &Point, b: &Point) -> f64 {
    Haversine.distance(*a, *b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_unproject_round_trip() {
        let samples = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 52.0),
            Point::new(-74.006, 40.7128),
            Point::new(179.9, -85.0),
            Point::new(-179.9, 85.0),
        ];
        for point in samples {
            let (x, y) = project(&point);
            let back = unproject(x, y);
            assert!((back.x() - point.x()).abs() < 1e-9, "{point:?}");
            assert!((back.y() - point.y()).abs() < 1e-9, "{point:?}");
        }
    }

    #[test]
    fn test_project_clamps_polar_latitudes() {
        let (_, y_pole) = project(&Point::new(0.0, 90.0));
        let (_, y_max) = project(&Point::new(0.0, MAX_MERCATOR_LATITUDE));
        assert_eq!(y_pole, y_max);
        assert!(y_pole.is_finite());
    }

    #[test]
    fn test_cell_containing_is_floor_division() {
        // Equator/meridian crossing: 1 degree of longitude is ~111 km, so
        // a point slightly west of the meridian lands in a negative cell.
        let east = Point::new(0.001, 0.0);
        let west = Point::new(-0.001, 0.0);
        let cell_east = cell_containing(&east, 10.0);
        let cell_west = cell_containing(&west, 10.0);
        assert!(cell_east.x >= 0);
        assert!(cell_west.x < 0);
    }

    #[test]
    fn test_cell_center_round_trip() {
        let point = Point::new(5.0, 52.0);
        let cell = cell_containing(&point, 10.0);
        let center = cell_center(cell, 10.0);
        // The center of the containing cell is within half a cell diagonal
        let dist = distance_meters(&point, &center);
        assert!(dist < 10.0, "distance {dist}");
        assert_eq!(cell_containing(&center, 10.0), cell);
    }

    #[test]
    fn test_distance_meters_sanity() {
        let a = Point::new(5.0, 52.0);
        let b = Point::new(5.0, 52.01);
        let dist = distance_meters(&a, &b);
        // 0.01 degrees of latitude is ~1.11 km
        assert!((1000.0..1300.0).contains(&dist), "distance {dist}");
        assert_eq!(distance_meters(&a, &a), 0.0);
    }
}
