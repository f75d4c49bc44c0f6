use crate::model::{DeliveryZoneDraft, LatLng, ZoneFields, ZoneGeometry, ZoneKind};
use geojson::Geometry;
use rusqlite::types::Type;
use rusqlite::Row;
use std::sync::OnceLock;
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "delivery_zone";

pub enum Columns {
    Id,
    RestaurantId,
    Name,
    ZoneType,
    CenterLat,
    CenterLon,
    RadiusKm,
    Polygon,
    DeliveryFee,
    MinimumOrder,
    DeliveryTimeMin,
    DeliveryTimeMax,
    Priority,
    Color,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::RestaurantId => "restaurant_id",
            Columns::Name => "name",
            Columns::ZoneType => "zone_type",
            Columns::CenterLat => "center_lat",
            Columns::CenterLon => "center_lon",
            Columns::RadiusKm => "radius_km",
            Columns::Polygon => "polygon",
            Columns::DeliveryFee => "delivery_fee",
            Columns::MinimumOrder => "minimum_order",
            Columns::DeliveryTimeMin => "delivery_time_min",
            Columns::DeliveryTimeMax => "delivery_time_max",
            Columns::Priority => "priority",
            Columns::Color => "color",
            Columns::Description => "description",
            Columns::IsActive => "is_active",
            Columns::CreatedAt => "created_at",
            Columns::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryZone {
    pub id: i64,
    pub restaurant_id: String,
    pub name: String,
    pub geometry: ZoneGeometry,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    pub delivery_time_min: i64,
    pub delivery_time_max: i64,
    pub priority: i64,
    pub color: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl DeliveryZone {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::RestaurantId,
                Columns::Name,
                Columns::ZoneType,
                Columns::CenterLat,
                Columns::CenterLon,
                Columns::RadiusKm,
                Columns::Polygon,
                Columns::DeliveryFee,
                Columns::MinimumOrder,
                Columns::DeliveryTimeMin,
                Columns::DeliveryTimeMax,
                Columns::Priority,
                Columns::Color,
                Columns::Description,
                Columns::IsActive,
                Columns::CreatedAt,
                Columns::UpdatedAt,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<Self> {
        |row| {
            Ok(Self {
                id: row.get(Columns::Id.as_str())?,
                restaurant_id: row.get(Columns::RestaurantId.as_str())?,
                name: row.get(Columns::Name.as_str())?,
                geometry: geometry(row)?,
                delivery_fee: row.get(Columns::DeliveryFee.as_str())?,
                minimum_order: row.get(Columns::MinimumOrder.as_str())?,
                delivery_time_min: row.get(Columns::DeliveryTimeMin.as_str())?,
                delivery_time_max: row.get(Columns::DeliveryTimeMax.as_str())?,
                priority: row.get(Columns::Priority.as_str())?,
                color: row.get(Columns::Color.as_str())?,
                description: row.get(Columns::Description.as_str())?,
                is_active: row.get(Columns::IsActive.as_str())?,
                created_at: row.get(Columns::CreatedAt.as_str())?,
                updated_at: row.get(Columns::UpdatedAt.as_str())?,
            })
        }
    }

    pub fn zone_type(&self) -> ZoneKind {
        self.geometry.kind()
    }

    pub fn fields(&self) -> ZoneFields {
        ZoneFields {
            name: self.name.clone(),
            description: self.description.clone(),
            delivery_fee: self.delivery_fee,
            minimum_order: self.minimum_order,
            delivery_time_min: self.delivery_time_min,
            delivery_time_max: self.delivery_time_max,
            priority: self.priority,
            color: self.color.clone(),
        }
    }

    pub fn draft(&self) -> DeliveryZoneDraft {
        DeliveryZoneDraft::new(self.geometry.clone(), self.fields())
    }

    #[cfg(test)]
    pub fn mock_draft() -> DeliveryZoneDraft {
        DeliveryZoneDraft::new(
            ZoneGeometry::circle(LatLng::new(38.72, -9.14), 2.0),
            ZoneFields {
                name: "Centro".into(),
                delivery_fee: 2.5,
                minimum_order: 10.0,
                ..ZoneFields::default()
            },
        )
    }
}

/// Polygons are kept as GeoJSON with a single outer ring
pub fn ring_to_geo_json(ring: &[LatLng]) -> serde_json::Result<String> {
    let geometry = Geometry::new(geojson::Value::Polygon(vec![ring
        .iter()
        .map(LatLng::position)
        .collect()]));
    serde_json::to_string(&geometry)
}

pub fn ring_from_geo_json(geo_json: &str) -> Result<Vec<LatLng>, String> {
    let geometry: Geometry = serde_json::from_str(geo_json).map_err(|e| e.to_string())?;
    let geojson::Value::Polygon(rings) = geometry.value else {
        return Err("stored geometry is not a polygon".into());
    };
    let exterior = rings.first().ok_or("stored polygon has no rings")?;
    exterior
        .iter()
        .map(|it| LatLng::from_position(it).ok_or_else(|| "invalid position".to_string()))
        .collect()
}

fn geometry(row: &Row) -> rusqlite::Result<ZoneGeometry> {
    let zone_type: String = row.get(Columns::ZoneType.as_str())?;
    let zone_type: ZoneKind = zone_type
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    match zone_type {
        ZoneKind::Circle => Ok(ZoneGeometry::circle(
            LatLng::new(
                row.get(Columns::CenterLat.as_str())?,
                row.get(Columns::CenterLon.as_str())?,
            ),
            row.get(Columns::RadiusKm.as_str())?,
        )),
        ZoneKind::Polygon => {
            let polygon: String = row.get(Columns::Polygon.as_str())?;
            let ring = ring_from_geo_json(&polygon)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, e.into()))?;
            Ok(ZoneGeometry::Polygon { ring })
        }
    }
}
