use crate::db::delivery_zone::schema::DeliveryZone;
use crate::db::restaurant_location::schema::RestaurantLocation;
use crate::model::{ZoneGeometry, ZoneKind};
use crate::service::drawing_session::{DrawingSession, SessionState};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcZone {
    pub id: i64,
    pub restaurant_id: String,
    pub name: String,
    pub zone_type: ZoneKind,
    pub geometry: ZoneGeometry,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    pub delivery_time_min: i64,
    pub delivery_time_max: i64,
    pub priority: i64,
    pub color: String,
    pub description: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<DeliveryZone> for RpcZone {
    fn from(val: DeliveryZone) -> Self {
        RpcZone {
            id: val.id,
            zone_type: val.zone_type(),
            restaurant_id: val.restaurant_id,
            name: val.name,
            geometry: val.geometry,
            delivery_fee: val.delivery_fee,
            minimum_order: val.minimum_order,
            delivery_time_min: val.delivery_time_min,
            delivery_time_max: val.delivery_time_max,
            priority: val.priority,
            color: val.color,
            description: val.description,
            is_active: val.is_active,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRestaurantLocation {
    pub restaurant_id: String,
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<RestaurantLocation> for RpcRestaurantLocation {
    fn from(val: RestaurantLocation) -> Self {
        RpcRestaurantLocation {
            restaurant_id: val.restaurant_id,
            lat: val.lat,
            lon: val.lon,
            formatted_address: val.formatted_address,
            updated_at: val.updated_at,
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct RpcDrawingSession {
    pub session_id: String,
    pub restaurant_id: String,
    #[serde(flatten)]
    pub state: SessionState,
}

impl RpcDrawingSession {
    pub fn new(session_id: &str, session: &DrawingSession) -> Self {
        RpcDrawingSession {
            session_id: session_id.into(),
            restaurant_id: session.restaurant_id.clone(),
            state: session.state.clone(),
        }
    }
}
