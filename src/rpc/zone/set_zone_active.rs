use crate::rpc::model::RpcZone;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub id: i64,
    pub active: bool,
}

pub async fn run(params: Params, pool: &Pool) -> Result<RpcZone> {
    service::delivery_zone::set_active(params.id, params.active, pool)
        .await
        .map(Into::into)
}
