use super::{blocking_queries, schema::DeliveryZone};
use crate::model::{DeliveryZoneDraft, ZonePatch};
use crate::Result;
use deadpool_sqlite::Pool;

pub async fn insert(
    restaurant_id: impl Into<String>,
    draft: DeliveryZoneDraft,
    pool: &Pool,
) -> Result<DeliveryZone> {
    let restaurant_id = restaurant_id.into();
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::insert(&restaurant_id, &draft, conn))
        .await?
}

pub async fn select_by_id(id: i64, pool: &Pool) -> Result<Option<DeliveryZone>> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_id(id, conn))
        .await?
}

pub async fn select_by_restaurant_id(
    restaurant_id: impl Into<String>,
    include_inactive: bool,
    pool: &Pool,
) -> Result<Vec<DeliveryZone>> {
    let restaurant_id = restaurant_id.into();
    pool.get()
        .await?
        .interact(move |conn| {
            blocking_queries::select_by_restaurant_id(&restaurant_id, include_inactive, conn)
        })
        .await?
}

pub async fn patch(id: i64, patch: ZonePatch, pool: &Pool) -> Result<Option<DeliveryZone>> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::patch(id, patch, conn))
        .await?
}

pub async fn set_active(id: i64, is_active: bool, pool: &Pool) -> Result<Option<DeliveryZone>> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::set_active(id, is_active, conn))
        .await?
}

pub async fn delete(id: i64, pool: &Pool) -> Result<bool> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::delete(id, conn))
        .await?
}

#[cfg(test)]
pub async fn set_created_at(id: i64, created_at: &'static str, pool: &Pool) -> Result<()> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::set_created_at(id, created_at, conn))
        .await?
}
