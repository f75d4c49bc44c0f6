//! Turns shapes drawn on the operator's map into stored zones.
//!
//! ```text
//! Idle -> ToolSelected -> Drawing -> PendingShape -> Saving -> Idle
//!                                          ^            |
//!                                          +- invalid --+
//! ```
//!
//! Every transition except the store write is local and synchronous. A
//! cancel that lands while the write is in flight can't stop it, the write
//! is reported as needing reconciliation instead.

use crate::db::delivery_zone::schema::DeliveryZone;
use crate::model::zone_draft::ZONE_COLORS;
use crate::model::{DeliveryZoneDraft, LatLng, ZoneFields, ZoneGeometry, ZoneKind, ZonePatch};
use crate::service::delivery_zone;
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

/// Finished shape as reported by the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawShape {
    Circle { center: LatLng, radius_m: f64 },
    Polygon { path: Vec<LatLng> },
}

impl RawShape {
    pub fn kind(&self) -> ZoneKind {
        match self {
            RawShape::Circle { .. } => ZoneKind::Circle,
            RawShape::Polygon { .. } => ZoneKind::Polygon,
        }
    }

    pub fn into_geometry(self) -> ZoneGeometry {
        match self {
            RawShape::Circle { center, radius_m } => ZoneGeometry::circle(center, radius_m / 1000.0),
            RawShape::Polygon { path } => ZoneGeometry::polygon(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingZone {
    pub geometry: ZoneGeometry,
    pub fields: ZoneFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    ToolSelected { tool: ZoneKind },
    Drawing { tool: ZoneKind },
    PendingShape { pending: PendingZone },
    Saving { ticket: u64, pending: PendingZone },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::ToolSelected { .. } => "tool_selected",
            SessionState::Drawing { .. } => "drawing",
            SessionState::PendingShape { .. } => "pending_shape",
            SessionState::Saving { .. } => "saving",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub save_in_flight: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawingSession {
    pub restaurant_id: String,
    pub state: SessionState,
    #[serde(skip)]
    zone_count: usize,
    #[serde(skip)]
    next_ticket: u64,
}

impl DrawingSession {
    pub fn new(restaurant_id: impl Into<String>, zone_count: usize) -> Self {
        DrawingSession {
            restaurant_id: restaurant_id.into(),
            state: SessionState::Idle,
            zone_count,
            next_ticket: 1,
        }
    }

    /// Picking another tool before anything was drawn replaces the choice
    pub fn select_tool(&mut self, tool: ZoneKind) -> Result<()> {
        match self.state {
            SessionState::Idle
            | SessionState::ToolSelected { .. }
            | SessionState::Drawing { .. } => {
                self.state = SessionState::ToolSelected { tool };
                Ok(())
            }
            _ => Err(self.illegal("select a tool")),
        }
    }

    pub fn begin_drawing(&mut self) -> Result<()> {
        match self.state {
            SessionState::ToolSelected { tool } => {
                self.state = SessionState::Drawing { tool };
                Ok(())
            }
            _ => Err(self.illegal("start drawing")),
        }
    }

    pub fn on_shape_completed(&mut self, shape: RawShape) -> Result<&PendingZone> {
        let tool = match self.state {
            SessionState::ToolSelected { tool } | SessionState::Drawing { tool } => tool,
            SessionState::PendingShape { .. } => {
                return Err(Error::Conflict(
                    "Another shape is waiting to be saved, confirm or cancel it first".into(),
                ))
            }
            _ => return Err(self.illegal("complete a shape")),
        };
        if shape.kind() != tool {
            return Err(Error::Conflict(format!(
                "Got a {} shape while the {} tool is selected",
                shape.kind(),
                tool,
            )));
        }
        let fields = ZoneFields {
            color: ZONE_COLORS[self.zone_count % ZONE_COLORS.len()].into(),
            ..ZoneFields::default()
        };
        self.state = SessionState::PendingShape {
            pending: PendingZone {
                geometry: shape.into_geometry(),
                fields,
            },
        };
        self.pending()
    }

    /// Changes the draft in memory only, checks happen on confirm
    pub fn configure_pending(&mut self, patch: ZonePatch) -> Result<&PendingZone> {
        if patch.geometry.is_some() {
            return Err(Error::Validation(
                "The shape comes from the map, redraw it to change it".into(),
            ));
        }
        let SessionState::PendingShape { pending } = &mut self.state else {
            return Err(self.illegal("configure a zone"));
        };
        pending.fields = patch.apply_fields(pending.fields.clone());
        self.pending()
    }

    pub fn pending(&self) -> Result<&PendingZone> {
        match &self.state {
            SessionState::PendingShape { pending } | SessionState::Saving { pending, .. } => {
                Ok(pending)
            }
            _ => Err(self.illegal("read the pending zone")),
        }
    }

    /// Validates the pending zone and hands out the ticket the store write
    /// must present to [DrawingSession::finish_save]. An invalid zone stays
    /// pending so the operator can fix it.
    pub fn begin_save(&mut self, default_name: &str) -> Result<(u64, DeliveryZoneDraft)> {
        let SessionState::PendingShape { pending } = &self.state else {
            return Err(self.illegal("save"));
        };
        let mut fields = pending.fields.clone();
        if fields.name.trim().is_empty() {
            fields.name = default_name.into();
        }
        let draft = DeliveryZoneDraft::new(pending.geometry.clone(), fields).normalized()?;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let pending = pending.clone();
        self.state = SessionState::Saving { ticket, pending };
        Ok((ticket, draft))
    }

    pub fn finish_save(
        &mut self,
        ticket: u64,
        res: Result<DeliveryZone>,
    ) -> Result<DeliveryZone> {
        let pending = match &self.state {
            SessionState::Saving {
                ticket: current,
                pending,
            } if *current == ticket => pending.clone(),
            _ => return reconcile(res),
        };
        match res {
            Ok(zone) => {
                self.state = SessionState::Idle;
                self.zone_count += 1;
                Ok(zone)
            }
            Err(e) if is_fixable(&e) => {
                self.state = SessionState::PendingShape { pending };
                Err(e)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    pub fn cancel(&mut self) -> CancelOutcome {
        let save_in_flight = matches!(self.state, SessionState::Saving { .. });
        self.state = SessionState::Idle;
        CancelOutcome { save_in_flight }
    }

    fn illegal(&self, action: &str) -> Error {
        Error::Conflict(format!(
            "Can't {action} while the drawing session is {}",
            self.state.name()
        ))
    }
}

// The write outlived its session, the caller has to decide what to do with it
fn reconcile(res: Result<DeliveryZone>) -> Result<DeliveryZone> {
    match res {
        Ok(zone) => {
            warn!(
                zone_id = zone.id,
                restaurant_id = %zone.restaurant_id,
                "Zone was saved after its drawing session had been cancelled",
            );
            Err(Error::ReconciliationRequired(zone.id))
        }
        Err(e) => Err(e),
    }
}

fn is_fixable(error: &Error) -> bool {
    matches!(
        error,
        Error::InvalidGeometry(_) | Error::Validation(_) | Error::Conflict(_)
    )
}

/// Sessions nobody touched for this long are dropped on the next open
pub const SESSION_IDLE_TTL: Duration = Duration::hours(2);

struct OpenSession {
    session: DrawingSession,
    touched_at: OffsetDateTime,
}

/// Open drawing sessions, keyed by a random id. Clients are expected to close
/// their sessions, abandoned ones expire after [SESSION_IDLE_TTL].
#[derive(Default)]
pub struct DrawingSessions {
    sessions: Mutex<HashMap<String, OpenSession>>,
}

impl DrawingSessions {
    pub fn open(&self, session: DrawingSession) -> String {
        let now = OffsetDateTime::now_utc();
        self.evict_idle(now);
        let id = Uuid::new_v4().to_string();
        self.lock().insert(
            id.clone(),
            OpenSession {
                session,
                touched_at: now,
            },
        );
        id
    }

    /// Runs `f` on the session without holding the lock across any await
    pub fn with<R>(&self, id: &str, f: impl FnOnce(&mut DrawingSession) -> Result<R>) -> Result<R> {
        let mut sessions = self.lock();
        let open = sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("Drawing session {id} doesn't exist")))?;
        open.touched_at = OffsetDateTime::now_utc();
        f(&mut open.session)
    }

    pub fn close(&self, id: &str) -> Result<DrawingSession> {
        self.lock()
            .remove(id)
            .map(|open| open.session)
            .ok_or_else(|| Error::NotFound(format!("Drawing session {id} doesn't exist")))
    }

    /// A session closed while its write was in flight is treated like a
    /// cancelled one
    pub fn finish_save(
        &self,
        id: &str,
        ticket: u64,
        res: Result<DeliveryZone>,
    ) -> Result<DeliveryZone> {
        match self.lock().get_mut(id) {
            Some(open) => open.session.finish_save(ticket, res),
            None => reconcile(res),
        }
    }

    /// Drops sessions idle for longer than [SESSION_IDLE_TTL], returns how
    /// many were dropped
    pub fn evict_idle(&self, now: OffsetDateTime) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|id, open| {
            let keep = now - open.touched_at <= SESSION_IDLE_TTL;
            if !keep {
                info!(
                    session_id = %id,
                    restaurant_id = %open.session.restaurant_id,
                    "Dropped idle drawing session",
                );
            }
            keep
        });
        before - sessions.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, OpenSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub async fn start(
    restaurant_id: &str,
    sessions: &DrawingSessions,
    pool: &Pool,
) -> Result<(String, DrawingSession)> {
    let zones = delivery_zone::list_for_restaurant(restaurant_id, true, pool).await?;
    let session = DrawingSession::new(delivery_zone::validate_restaurant_id(restaurant_id)?, zones.len());
    let id = sessions.open(session.clone());
    info!(session_id = %id, restaurant_id, "Opened drawing session");
    Ok((id, session))
}

/// Stores the pending zone. The session is only released for further
/// drawing once the store has answered.
pub async fn confirm(
    session_id: &str,
    sessions: &DrawingSessions,
    pool: &Pool,
) -> Result<DeliveryZone> {
    let restaurant_id = sessions.with(session_id, |session| {
        session.pending()?;
        Ok(session.restaurant_id.clone())
    })?;
    let zone_count = delivery_zone::list_for_restaurant(&restaurant_id, true, pool)
        .await?
        .len();
    let default_name = format!("Zone {}", zone_count + 1);
    let (ticket, draft) =
        sessions.with(session_id, |session| session.begin_save(&default_name))?;
    let res = delivery_zone::create(&restaurant_id, draft, pool).await;
    let zone = sessions.finish_save(session_id, ticket, res)?;
    info!(session_id, zone_id = zone.id, "Confirmed drawn zone");
    Ok(zone)
}
