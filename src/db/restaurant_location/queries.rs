use super::{blocking_queries, schema::RestaurantLocation};
use crate::model::LatLng;
use crate::Result;
use deadpool_sqlite::Pool;

pub async fn upsert(
    restaurant_id: impl Into<String>,
    coordinate: LatLng,
    formatted_address: Option<String>,
    pool: &Pool,
) -> Result<RestaurantLocation> {
    let restaurant_id = restaurant_id.into();
    pool.get()
        .await?
        .interact(move |conn| {
            blocking_queries::upsert(
                &restaurant_id,
                coordinate,
                formatted_address.as_deref(),
                conn,
            )
        })
        .await?
}

pub async fn select_by_restaurant_id(
    restaurant_id: impl Into<String>,
    pool: &Pool,
) -> Result<Option<RestaurantLocation>> {
    let restaurant_id = restaurant_id.into();
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_restaurant_id(&restaurant_id, conn))
        .await?
}
