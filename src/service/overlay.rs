use crate::db::delivery_zone::schema::DeliveryZone;
use crate::model::{LatLng, ZoneGeometry};
use crate::service::delivery_zone;
use crate::Result;
use deadpool_sqlite::Pool;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Every zone of a restaurant, active or not, ready to be drawn on a map
pub async fn zone_overlays(restaurant_id: &str, pool: &Pool) -> Result<FeatureCollection> {
    let zones = delivery_zone::list_for_restaurant(restaurant_id, true, pool).await?;
    Ok(overlays(&zones))
}

pub fn overlays(zones: &[DeliveryZone]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.iter().map(overlay).collect(),
        foreign_members: None,
    }
}

// Circles become a center point, the map draws the radius itself
fn overlay(zone: &DeliveryZone) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".into(), json!(zone.id));
    properties.insert("name".into(), json!(zone.name));
    properties.insert("color".into(), json!(zone.color));
    properties.insert("is_active".into(), json!(zone.is_active));
    properties.insert("priority".into(), json!(zone.priority));
    let geometry = match &zone.geometry {
        ZoneGeometry::Circle(circle) => {
            properties.insert("radius_km".into(), json!(circle.radius_km));
            Value::Point(circle.center.position())
        }
        ZoneGeometry::Polygon { ring } => {
            Value::Polygon(vec![ring.iter().map(LatLng::position).collect()])
        }
    };
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: Some(Id::Number(zone.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}
