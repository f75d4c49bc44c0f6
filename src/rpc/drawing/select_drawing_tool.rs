use crate::model::ZoneKind;
use crate::rpc::model::RpcDrawingSession;
use crate::service::drawing_session::DrawingSessions;
use crate::Result;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub session_id: String,
    pub tool: ZoneKind,
}

pub fn run(params: Params, sessions: &DrawingSessions) -> Result<RpcDrawingSession> {
    sessions.with(&params.session_id, |session| {
        session.select_tool(params.tool)?;
        Ok(RpcDrawingSession::new(&params.session_id, session))
    })
}
