use crate::rpc::model::RpcDrawingSession;
use crate::service::drawing_session::{self, DrawingSessions};
use crate::Result;
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
}

pub async fn run(
    params: Params,
    sessions: &DrawingSessions,
    pool: &Pool,
) -> Result<RpcDrawingSession> {
    let (id, session) = drawing_session::start(&params.restaurant_id, sessions, pool).await?;
    Ok(RpcDrawingSession::new(&id, &session))
}
