use crate::model::LatLng;
use crate::service::geofence::{self, ZoneMatch};
use crate::Result;
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Res {
    #[serde(flatten)]
    pub zone: ZoneMatch,
    pub estimated_time: String,
}

/// `null` means the point is outside of the delivery area
pub async fn run(params: Params, pool: &Pool) -> Result<Option<Res>> {
    let point = LatLng::new(params.lat, params.lon);
    let zone = geofence::resolve(point, &params.restaurant_id, pool).await?;
    Ok(zone.map(|zone| Res {
        estimated_time: zone.estimated_time(),
        zone,
    }))
}
