use crate::db::{self, delivery_zone::schema::DeliveryZone};
use crate::model::{DeliveryZoneDraft, ZonePatch};
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use tracing::info;

pub async fn create(
    restaurant_id: &str,
    draft: DeliveryZoneDraft,
    pool: &Pool,
) -> Result<DeliveryZone> {
    let restaurant_id = validate_restaurant_id(restaurant_id)?;
    let draft = draft.normalized()?;
    let zone = db::delivery_zone::queries::insert(restaurant_id, draft, pool).await?;
    info!(
        zone_id = zone.id,
        restaurant_id = %zone.restaurant_id,
        zone_name = %zone.name,
        zone_type = %zone.zone_type(),
        "Created delivery zone",
    );
    Ok(zone)
}

pub async fn get(zone_id: i64, pool: &Pool) -> Result<DeliveryZone> {
    db::delivery_zone::queries::select_by_id(zone_id, pool)
        .await?
        .ok_or_else(|| not_found(zone_id))
}

pub async fn update(zone_id: i64, patch: ZonePatch, pool: &Pool) -> Result<DeliveryZone> {
    let zone = db::delivery_zone::queries::patch(zone_id, patch, pool)
        .await?
        .ok_or_else(|| not_found(zone_id))?;
    info!(zone_id, restaurant_id = %zone.restaurant_id, "Updated delivery zone");
    Ok(zone)
}

pub async fn delete(zone_id: i64, pool: &Pool) -> Result<()> {
    if !db::delivery_zone::queries::delete(zone_id, pool).await? {
        return Err(not_found(zone_id));
    }
    info!(zone_id, "Deleted delivery zone");
    Ok(())
}

pub async fn set_active(zone_id: i64, active: bool, pool: &Pool) -> Result<DeliveryZone> {
    let zone = db::delivery_zone::queries::set_active(zone_id, active, pool)
        .await?
        .ok_or_else(|| not_found(zone_id))?;
    info!(zone_id, active, "Toggled delivery zone");
    Ok(zone)
}

pub async fn list_for_restaurant(
    restaurant_id: &str,
    include_inactive: bool,
    pool: &Pool,
) -> Result<Vec<DeliveryZone>> {
    let restaurant_id = validate_restaurant_id(restaurant_id)?;
    db::delivery_zone::queries::select_by_restaurant_id(restaurant_id, include_inactive, pool).await
}

pub fn validate_restaurant_id(restaurant_id: &str) -> Result<&str> {
    let restaurant_id = restaurant_id.trim();
    if restaurant_id.is_empty() {
        return Err(Error::Validation("restaurant_id can't be empty".into()));
    }
    Ok(restaurant_id)
}

fn not_found(zone_id: i64) -> Error {
    Error::NotFound(format!("Zone {zone_id} doesn't exist"))
}
