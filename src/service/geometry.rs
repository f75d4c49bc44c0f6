//! Distance and containment math for delivery zones.
//!
//! Circles are tested with great-circle distances. Polygons are tested in a
//! planar lon/lat space, which is accurate enough at city scale but not
//! geodesically exact.

use crate::model::LatLng;
use geo::{Area, Contains, Intersects, Line, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// IUGG mean earth radius
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Same sphere as the haversine distance, so circle and polygon areas compare fairly
const KM_PER_DEG: f64 = EARTH_RADIUS_KM * PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: LatLng,
    pub radius_km: f64,
}

impl Circle {
    pub fn area_km2(&self) -> f64 {
        PI * self.radius_km * self.radius_km
    }
}

pub fn haversine_distance_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Boundary inclusive
pub fn point_in_circle(p: LatLng, c: &Circle) -> bool {
    haversine_distance_km(p, c.center) <= c.radius_km
}

pub fn point_in_polygon(p: LatLng, ring: &[LatLng]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    planar_polygon(ring).contains(&Point::from(p.coord()))
}

/// Shoelace area in km², the ring is projected around its mean latitude.
/// Only good enough to compare zones against each other.
pub fn polygon_area_approx(ring: &[LatLng]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let vertices = if is_closed(ring) {
        &ring[..ring.len() - 1]
    } else {
        ring
    };
    let mean_lat = vertices.iter().map(|it| it.lat).sum::<f64>() / vertices.len() as f64;
    let km_per_deg_lon = KM_PER_DEG * mean_lat.to_radians().cos();
    let projected: Vec<(f64, f64)> = ring
        .iter()
        .map(|it| (it.lon * km_per_deg_lon, it.lat * KM_PER_DEG))
        .collect();
    Polygon::new(LineString::from(projected), vec![]).unsigned_area()
}

pub fn is_closed(ring: &[LatLng]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => ring.len() > 1 && first == last,
        _ => false,
    }
}

pub fn distinct_vertices(ring: &[LatLng]) -> usize {
    let mut distinct: Vec<&LatLng> = vec![];
    for vertex in ring {
        if !distinct.contains(&vertex) {
            distinct.push(vertex);
        }
    }
    distinct.len()
}

/// Checks that no two non-adjacent edges of a closed ring touch.
/// Repeated consecutive vertices are ignored.
pub fn is_simple_ring(ring: &[LatLng]) -> bool {
    let mut vertices = ring.to_vec();
    vertices.dedup();
    let edges: Vec<Line<f64>> = vertices
        .windows(2)
        .map(|it| Line::new(it[0].coord(), it[1].coord()))
        .collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return false;
            }
        }
    }
    true
}

fn planar_polygon(ring: &[LatLng]) -> Polygon<f64> {
    let exterior: Vec<_> = ring.iter().map(LatLng::coord).collect();
    Polygon::new(LineString::from(exterior), vec![])
}
