use super::geocoder::{GeocodedAddress, Geocoder};
use crate::db::{self, restaurant_location::schema::RestaurantLocation};
use crate::model::LatLng;
use crate::service::delivery_zone::validate_restaurant_id;
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use tracing::info;

pub async fn geocode(address: &str, geocoder: &impl Geocoder) -> Result<GeocodedAddress> {
    if address.trim().is_empty() {
        return Err(Error::Validation("address can't be empty".into()));
    }
    geocoder.geocode(address.trim()).await
}

/// Manual map drags come without an address
pub async fn set_restaurant_location(
    restaurant_id: &str,
    coordinate: LatLng,
    address: Option<String>,
    pool: &Pool,
) -> Result<RestaurantLocation> {
    let restaurant_id = validate_restaurant_id(restaurant_id)?;
    coordinate.validate()?;
    let address = address.filter(|it| !it.trim().is_empty());
    let location =
        db::restaurant_location::queries::upsert(restaurant_id, coordinate, address, pool).await?;
    info!(
        restaurant_id,
        lat = location.lat,
        lon = location.lon,
        "Updated restaurant location",
    );
    Ok(location)
}

pub async fn get_restaurant_location(
    restaurant_id: &str,
    pool: &Pool,
) -> Result<RestaurantLocation> {
    let restaurant_id = validate_restaurant_id(restaurant_id)?;
    db::restaurant_location::queries::select_by_restaurant_id(restaurant_id, pool)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!("Restaurant {restaurant_id} has no location yet"))
        })
}

pub async fn locate_restaurant(
    restaurant_id: &str,
    address: &str,
    geocoder: &impl Geocoder,
    pool: &Pool,
) -> Result<RestaurantLocation> {
    validate_restaurant_id(restaurant_id)?;
    let geocoded = geocode(address, geocoder).await?;
    set_restaurant_location(
        restaurant_id,
        geocoded.coordinate,
        Some(geocoded.formatted_address),
        pool,
    )
    .await
}
