//! Decides which delivery zone, if any, serves a customer coordinate.
//!
//! Overlapping zones are ranked by priority (higher wins), then by coverage
//! area (smaller wins), then by creation time (newer wins) and finally by id
//! (higher wins), so the same zone set always yields the same match no matter
//! how it was loaded. Nothing here writes to the store.

use super::geocoder::Geocoder;
use crate::db::{self, delivery_zone::schema::DeliveryZone};
use crate::model::LatLng;
use crate::service::delivery_zone::validate_restaurant_id;
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMatch {
    pub zone_id: i64,
    pub zone_name: String,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    pub delivery_time_min: i64,
    pub delivery_time_max: i64,
}

impl ZoneMatch {
    pub fn estimated_time(&self) -> String {
        format!("{}-{} min", self.delivery_time_min, self.delivery_time_max)
    }

    pub fn shortfall(&self, order_total: f64) -> f64 {
        (self.minimum_order - order_total).max(0.0)
    }
}

impl From<&DeliveryZone> for ZoneMatch {
    fn from(zone: &DeliveryZone) -> Self {
        ZoneMatch {
            zone_id: zone.id,
            zone_name: zone.name.clone(),
            delivery_fee: zone.delivery_fee,
            minimum_order: zone.minimum_order,
            delivery_time_min: zone.delivery_time_min,
            delivery_time_max: zone.delivery_time_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOptions {
    pub available: bool,
    pub fee: f64,
    pub minimum_order: f64,
    pub estimated_time: String,
    pub zone_name: Option<String>,
    pub coordinate: LatLng,
    pub formatted_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMinimumCheck {
    pub is_valid: bool,
    pub minimum_required: Option<f64>,
    pub shortfall: Option<f64>,
}

/// Inactive zones never match, even if the caller passes them in
pub fn select_zone(point: LatLng, zones: &[DeliveryZone]) -> Option<&DeliveryZone> {
    zones
        .iter()
        .filter(|it| it.is_active && it.geometry.contains(point))
        .max_by(|a, b| rank(a, b))
}

fn rank(a: &DeliveryZone, b: &DeliveryZone) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.geometry.area_km2().total_cmp(&a.geometry.area_km2()))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Coverage lookup for order acceptance. `None` is the normal "not covered"
/// answer. Malformed input is an error instead: an out-of-range point fails
/// with [Error::InvalidGeometry] and a blank restaurant id with
/// [Error::Validation], store failures propagate as they are.
pub async fn resolve(point: LatLng, restaurant_id: &str, pool: &Pool) -> Result<Option<ZoneMatch>> {
    point.validate()?;
    let restaurant_id = validate_restaurant_id(restaurant_id)?;
    let zones =
        db::delivery_zone::queries::select_by_restaurant_id(restaurant_id, false, pool).await?;
    Ok(select_zone(point, &zones).map(ZoneMatch::from))
}

pub async fn delivery_options(
    restaurant_id: &str,
    address: &str,
    geocoder: &impl Geocoder,
    pool: &Pool,
) -> Result<DeliveryOptions> {
    let geocoded = geocoder.geocode(address).await?;
    let options = match resolve(geocoded.coordinate, restaurant_id, pool).await? {
        Some(zone) => DeliveryOptions {
            available: true,
            fee: zone.delivery_fee,
            minimum_order: zone.minimum_order,
            estimated_time: zone.estimated_time(),
            zone_name: Some(zone.zone_name),
            coordinate: geocoded.coordinate,
            formatted_address: geocoded.formatted_address,
        },
        None => DeliveryOptions {
            available: false,
            fee: 0.0,
            minimum_order: 0.0,
            estimated_time: "".into(),
            zone_name: None,
            coordinate: geocoded.coordinate,
            formatted_address: geocoded.formatted_address,
        },
    };
    Ok(options)
}

pub async fn check_order_minimum(
    restaurant_id: &str,
    point: LatLng,
    order_total: f64,
    pool: &Pool,
) -> Result<OrderMinimumCheck> {
    if !order_total.is_finite() || order_total < 0.0 {
        return Err(Error::Validation(format!(
            "order_total must be a non-negative amount, got {order_total}"
        )));
    }
    let check = match resolve(point, restaurant_id, pool).await? {
        Some(zone) => OrderMinimumCheck {
            is_valid: order_total >= zone.minimum_order,
            minimum_required: Some(zone.minimum_order),
            shortfall: Some(zone.shortfall(order_total)),
        },
        None => OrderMinimumCheck {
            is_valid: false,
            minimum_required: None,
            shortfall: None,
        },
    };
    Ok(check)
}
