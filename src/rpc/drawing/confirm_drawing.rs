use crate::rpc::model::RpcZone;
use crate::service::drawing_session::{self, DrawingSessions};
use crate::Result;
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub session_id: String,
}

pub async fn run(params: Params, sessions: &DrawingSessions, pool: &Pool) -> Result<RpcZone> {
    drawing_session::confirm(&params.session_id, sessions, pool)
        .await
        .map(Into::into)
}
