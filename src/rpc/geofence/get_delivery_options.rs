use crate::service::geocoder::Geocoder;
use crate::service::geofence::{self, DeliveryOptions};
use crate::Result;
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    pub address: String,
}

pub async fn run(params: Params, geocoder: &impl Geocoder, pool: &Pool) -> Result<DeliveryOptions> {
    geofence::delivery_options(&params.restaurant_id, &params.address, geocoder, pool).await
}
