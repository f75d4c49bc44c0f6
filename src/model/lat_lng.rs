use crate::{Error, Result};
use geo::Coord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lon: f64) -> Self {
        LatLng { lat, lon }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidGeometry(format!(
                "latitude {} is out of range",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::InvalidGeometry(format!(
                "longitude {} is out of range",
                self.lon
            )));
        }
        Ok(())
    }

    /// Planar coordinate, x is longitude
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    /// GeoJSON position, longitude first
    pub fn position(&self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }

    pub fn from_position(position: &[f64]) -> Option<LatLng> {
        match position {
            [lon, lat, ..] => Some(LatLng::new(*lat, *lon)),
            _ => None,
        }
    }
}
