use crate::model::LatLng;
use rusqlite::Row;
use std::sync::OnceLock;
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "restaurant_location";

pub enum Columns {
    RestaurantId,
    Lat,
    Lon,
    FormattedAddress,
    CreatedAt,
    UpdatedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::RestaurantId => "restaurant_id",
            Columns::Lat => "lat",
            Columns::Lon => "lon",
            Columns::FormattedAddress => "formatted_address",
            Columns::CreatedAt => "created_at",
            Columns::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantLocation {
    pub restaurant_id: String,
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl RestaurantLocation {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::RestaurantId,
                Columns::Lat,
                Columns::Lon,
                Columns::FormattedAddress,
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
                restaurant_id: row.get(Columns::RestaurantId.as_str())?,
                lat: row.get(Columns::Lat.as_str())?,
                lon: row.get(Columns::Lon.as_str())?,
                formatted_address: row.get(Columns::FormattedAddress.as_str())?,
                created_at: row.get(Columns::CreatedAt.as_str())?,
                updated_at: row.get(Columns::UpdatedAt.as_str())?,
            })
        }
    }

    pub fn coordinate(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}
