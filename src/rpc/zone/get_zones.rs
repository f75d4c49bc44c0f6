use crate::rpc::model::RpcZone;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn run(params: Params, pool: &Pool) -> Result<Vec<RpcZone>> {
    let zones = service::delivery_zone::list_for_restaurant(
        &params.restaurant_id,
        params.include_inactive,
        pool,
    )
    .await?;
    Ok(zones.into_iter().map(Into::into).collect())
}
