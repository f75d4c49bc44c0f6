use crate::rpc::model::RpcZone;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub id: i64,
}

pub async fn run(params: Params, pool: &Pool) -> Result<RpcZone> {
    let zone = service::delivery_zone::get(params.id, pool).await?;
    service::delivery_zone::delete(zone.id, pool).await?;
    Ok(zone.into())
}
