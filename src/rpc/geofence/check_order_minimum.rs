use crate::model::LatLng;
use crate::service::geofence::{self, OrderMinimumCheck};
use crate::Result;
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    pub lat: f64,
    pub lon: f64,
    pub order_total: f64,
}

pub async fn run(params: Params, pool: &Pool) -> Result<OrderMinimumCheck> {
    geofence::check_order_minimum(
        &params.restaurant_id,
        LatLng::new(params.lat, params.lon),
        params.order_total,
        pool,
    )
    .await
}
