use crate::rpc::model::RpcRestaurantLocation;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
}

pub async fn run(params: Params, pool: &Pool) -> Result<RpcRestaurantLocation> {
    service::location::get_restaurant_location(&params.restaurant_id, pool)
        .await
        .map(Into::into)
}
