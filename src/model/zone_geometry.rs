use super::LatLng;
use crate::service::geometry::{self, Circle};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZoneKind {
    Circle,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneGeometry {
    Circle(Circle),
    Polygon { ring: Vec<LatLng> },
}

impl ZoneGeometry {
    pub fn circle(center: LatLng, radius_km: f64) -> Self {
        ZoneGeometry::Circle(Circle { center, radius_km })
    }

    /// Accepts an open path as reported by the map and closes it
    pub fn polygon(path: Vec<LatLng>) -> Self {
        ZoneGeometry::Polygon { ring: path }.closed()
    }

    pub fn kind(&self) -> ZoneKind {
        match self {
            ZoneGeometry::Circle(_) => ZoneKind::Circle,
            ZoneGeometry::Polygon { .. } => ZoneKind::Polygon,
        }
    }

    pub fn closed(self) -> Self {
        match self {
            ZoneGeometry::Polygon { mut ring } => {
                if let Some(first) = ring.first().copied() {
                    if !geometry::is_closed(&ring) {
                        ring.push(first);
                    }
                }
                ZoneGeometry::Polygon { ring }
            }
            circle => circle,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ZoneGeometry::Circle(circle) => {
                circle.center.validate()?;
                if !circle.radius_km.is_finite() || circle.radius_km <= 0.0 {
                    return Err(Error::InvalidGeometry(format!(
                        "circle radius must be positive, got {} km",
                        circle.radius_km
                    )));
                }
            }
            ZoneGeometry::Polygon { ring } => {
                for vertex in ring {
                    vertex.validate()?;
                }
                if !geometry::is_closed(ring) {
                    return Err(Error::InvalidGeometry("polygon ring is not closed".into()));
                }
                let distinct = geometry::distinct_vertices(ring);
                if distinct < 3 {
                    return Err(Error::InvalidGeometry(format!(
                        "polygon needs at least 3 distinct vertices, got {distinct}"
                    )));
                }
                if geometry::polygon_area_approx(ring) <= 1e-9 {
                    return Err(Error::InvalidGeometry("polygon has no area".into()));
                }
                if !geometry::is_simple_ring(ring) {
                    return Err(Error::InvalidGeometry(
                        "polygon edges intersect each other".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, point: LatLng) -> bool {
        match self {
            ZoneGeometry::Circle(circle) => geometry::point_in_circle(point, circle),
            ZoneGeometry::Polygon { ring } => geometry::point_in_polygon(point, ring),
        }
    }

    pub fn area_km2(&self) -> f64 {
        match self {
            ZoneGeometry::Circle(circle) => circle.area_km2(),
            ZoneGeometry::Polygon { ring } => geometry::polygon_area_approx(ring),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ZoneGeometry, ZoneKind};
    use crate::model::LatLng;
    use crate::Error;
    use serde_json::json;

    fn triangle() -> Vec<LatLng> {
        vec![
            LatLng::new(38.70, -9.16),
            LatLng::new(38.70, -9.12),
            LatLng::new(38.74, -9.14),
        ]
    }

    #[test]
    fn polygon_closes_ring() {
        let ZoneGeometry::Polygon { ring } = ZoneGeometry::polygon(triangle()) else {
            panic!()
        };
        assert_eq!(4, ring.len());
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn closed_keeps_closed_ring() {
        let mut ring = triangle();
        ring.push(ring[0]);
        let ZoneGeometry::Polygon { ring } = ZoneGeometry::Polygon { ring }.closed() else {
            panic!()
        };
        assert_eq!(4, ring.len());
    }

    #[test]
    fn validate_circle() {
        let center = LatLng::new(38.72, -9.14);
        assert!(ZoneGeometry::circle(center, 2.0).validate().is_ok());
        assert!(matches!(
            ZoneGeometry::circle(center, 0.0).validate(),
            Err(Error::InvalidGeometry(_)),
        ));
        assert!(matches!(
            ZoneGeometry::circle(center, -1.0).validate(),
            Err(Error::InvalidGeometry(_)),
        ));
        assert!(matches!(
            ZoneGeometry::circle(LatLng::new(91.0, 0.0), 1.0).validate(),
            Err(Error::InvalidGeometry(_)),
        ));
    }

    #[test]
    fn validate_polygon() {
        assert!(ZoneGeometry::polygon(triangle()).validate().is_ok());
    }

    #[test]
    fn validate_polygon_with_repeated_vertices() {
        let a = LatLng::new(38.70, -9.16);
        let b = LatLng::new(38.70, -9.12);
        let c = LatLng::new(38.74, -9.14);
        assert!(ZoneGeometry::polygon(vec![a, b, b, c]).validate().is_ok());
        assert!(ZoneGeometry::polygon(vec![a, b, c, c]).validate().is_ok());
    }

    #[test]
    fn validate_polygon_with_two_distinct_vertices() {
        let a = LatLng::new(38.70, -9.16);
        let b = LatLng::new(38.70, -9.12);
        let geometry = ZoneGeometry::polygon(vec![a, b, b]);
        assert!(matches!(geometry.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn validate_open_polygon() {
        let geometry = ZoneGeometry::Polygon { ring: triangle() };
        assert!(matches!(geometry.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn validate_collinear_polygon() {
        let geometry = ZoneGeometry::polygon(vec![
            LatLng::new(38.70, -9.16),
            LatLng::new(38.71, -9.15),
            LatLng::new(38.72, -9.14),
        ]);
        assert!(matches!(geometry.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn validate_self_intersecting_polygon() {
        let geometry = ZoneGeometry::polygon(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
            LatLng::new(0.0, 1.0),
        ]);
        assert!(matches!(geometry.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn kind() {
        assert_eq!(
            ZoneKind::Circle,
            ZoneGeometry::circle(LatLng::new(0.0, 0.0), 1.0).kind()
        );
        assert_eq!(ZoneKind::Polygon, ZoneGeometry::polygon(triangle()).kind());
        assert_eq!("polygon", ZoneKind::Polygon.to_string());
        assert_eq!(Ok(ZoneKind::Circle), "circle".parse());
    }

    #[test]
    fn serde() -> crate::Result<()> {
        let circle: ZoneGeometry = serde_json::from_value(json!({
            "type": "circle",
            "center": { "lat": 38.72, "lon": -9.14 },
            "radius_km": 2.0,
        }))?;
        assert_eq!(ZoneGeometry::circle(LatLng::new(38.72, -9.14), 2.0), circle);
        let polygon: ZoneGeometry = serde_json::from_value(json!({
            "type": "polygon",
            "ring": [
                { "lat": 0.0, "lon": 0.0 },
                { "lat": 0.0, "lon": 1.0 },
                { "lat": 1.0, "lon": 0.0 },
            ],
        }))?;
        assert_eq!(ZoneKind::Polygon, polygon.kind());
        Ok(())
    }
}
