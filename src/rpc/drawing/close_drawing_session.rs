use crate::rpc::model::RpcDrawingSession;
use crate::service::drawing_session::DrawingSessions;
use crate::Result;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct Params {
    pub session_id: String,
}

/// Returns the last state of the closed session
pub fn run(params: Params, sessions: &DrawingSessions) -> Result<RpcDrawingSession> {
    let session = sessions.close(&params.session_id)?;
    info!(session_id = %params.session_id, "Closed drawing session");
    Ok(RpcDrawingSession::new(&params.session_id, &session))
}
