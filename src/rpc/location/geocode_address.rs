use crate::service::geocoder::{GeocodedAddress, Geocoder};
use crate::{service, Result};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub address: String,
}

pub async fn run(params: Params, geocoder: &impl Geocoder) -> Result<GeocodedAddress> {
    service::location::geocode(&params.address, geocoder).await
}
