use crate::model::LatLng;
use crate::rpc::model::RpcRestaurantLocation;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: Option<String>,
}

pub async fn run(params: Params, pool: &Pool) -> Result<RpcRestaurantLocation> {
    service::location::set_restaurant_location(
        &params.restaurant_id,
        LatLng::new(params.lat, params.lon),
        params.formatted_address,
        pool,
    )
    .await
    .map(Into::into)
}
