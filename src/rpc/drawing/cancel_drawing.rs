use crate::rpc::model::RpcDrawingSession;
use crate::service::drawing_session::DrawingSessions;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Params {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct Res {
    /// The zone may still show up, look for it before drawing it again
    pub save_in_flight: bool,
    pub session: RpcDrawingSession,
}

pub fn run(params: Params, sessions: &DrawingSessions) -> Result<Res> {
    sessions.with(&params.session_id, |session| {
        let outcome = session.cancel();
        Ok(Res {
            save_in_flight: outcome.save_in_flight,
            session: RpcDrawingSession::new(&params.session_id, session),
        })
    })
}
