use crate::rpc::model::RpcDrawingSession;
use crate::service::drawing_session::DrawingSessions;
use crate::Result;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub session_id: String,
}

pub fn run(params: Params, sessions: &DrawingSessions) -> Result<RpcDrawingSession> {
    sessions.with(&params.session_id, |session| {
        Ok(RpcDrawingSession::new(&params.session_id, session))
    })
}
