use crate::model::ZonePatch;
use crate::rpc::model::RpcZone;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub id: i64,
    pub patch: ZonePatch,
}

pub async fn run(params: Params, pool: &Pool) -> Result<RpcZone> {
    service::delivery_zone::update(params.id, params.patch, pool)
        .await
        .map(Into::into)
}
