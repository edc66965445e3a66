//! Rally Orchestration
//!
//! Runs the live ball for one tick and wires the consequences together:
//! rally length, fatigue, crowd reactions, telemetry and the rally timer.
//! Also owns the rules that decide when a point is over.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::{MatchSettings, TableConfig};
use crate::core::rng::DeterministicRng;
use crate::game::crowd::{CrowdEvent, CrowdSystem};
use crate::game::events::{TelemetryData, TelemetryRecorder};
use crate::game::fatigue::FatigueModel;
use crate::game::physics::{PhysicsEngine, StepOutcome, WindModel};
use crate::game::state::{BallState, PerSide, PlayerState, Side};

/// Distance from a table edge that still counts as an edge ball (m).
const EDGE_TOLERANCE: f32 = 0.02;

/// Why a point ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointReason {
    /// Ball left the table
    Out,
    /// Same player struck twice in a row
    DoubleContact,
    /// Ball bounced on the striker's own half
    WrongSide,
    /// Receiver let the ball bounce twice
    DoubleBounce,
    /// Tossed ball landed before the serve was struck
    ServeFault,
    /// Rally timer ran out
    Stalled,
}

/// A decided point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RallyOutcome {
    /// Side credited with the point
    pub winner: Side,
    /// Rule that ended the point
    pub reason: PointReason,
}

/// Everything a rally tick touches, lent by the controller.
pub struct RallyContext<'a> {
    /// Live ball
    pub ball: &'a mut BallState,
    /// Both players
    pub players: &'a mut PerSide<PlayerState>,
    /// Crowd tracker
    pub crowd: &'a mut CrowdSystem,
    /// Telemetry sink
    pub telemetry: &'a mut TelemetryRecorder,
    /// Physics random stream
    pub rng: &'a mut DeterministicRng,
    /// Simulated time after this tick
    pub now: f32,
}

/// What one rally tick produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RallyTick {
    /// Physics step result
    pub step: StepOutcome,
    /// The rally timer expired this tick
    pub stalled: bool,
}

/// Ties physics and the side models together during live play.
#[derive(Clone, Debug)]
pub struct RallyOrchestrator {
    physics: PhysicsEngine,
    fatigue: FatigueModel,
    rally_count: u32,
    strikes: u32,
    last_hit_at: f32,
    long_rally_threshold: u32,
    rally_timeout: f32,
}

impl RallyOrchestrator {
    /// Build for a table and match settings.
    pub fn new(table: TableConfig, settings: &MatchSettings) -> Self {
        Self {
            physics: PhysicsEngine::new(table, WindModel::from_settings(settings)),
            fatigue: FatigueModel,
            rally_count: 0,
            strikes: 0,
            last_hit_at: 0.0,
            long_rally_threshold: settings.long_rally_threshold,
            rally_timeout: settings.rally_timeout_seconds,
        }
    }

    /// Table in use.
    pub fn table(&self) -> &TableConfig {
        &self.physics.table
    }

    /// Bounces in the current rally.
    pub fn rally_count(&self) -> u32 {
        self.rally_count
    }

    /// Racket contacts in the current rally.
    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    /// Start a new rally at `now`.
    pub fn reset_rally(&mut self, now: f32) {
        self.rally_count = 0;
        self.strikes = 0;
        self.last_hit_at = now;
    }

    /// Record a racket contact at `now`.
    pub fn register_hit(&mut self, now: f32) {
        self.strikes += 1;
        self.last_hit_at = now;
    }

    /// Restart the rally timer without counting a contact.
    pub fn restart_timer(&mut self, now: f32) {
        self.last_hit_at = now;
    }

    /// Advance the live ball by `dt`.
    pub fn update(&mut self, ctx: &mut RallyContext<'_>, dt: f32) -> RallyTick {
        let step = self.physics.step(ctx.ball, dt, ctx.rng);

        if step.bounce {
            self.rally_count += 1;
            let mood = ctx.crowd.snapshot();
            for side in Side::BOTH {
                self.fatigue
                    .apply_fatigue(&mut ctx.players[side], self.rally_count, &mood);
            }

            if self.rally_count == self.long_rally_threshold {
                debug!("Long rally: {} bounces", self.rally_count);
                ctx.crowd.on_event(CrowdEvent::LongRally);
                ctx.telemetry.track(ctx.now, TelemetryData::LongRally { length: self.rally_count });
            }

            if let Some(side) = step.side {
                if self.is_edge_ball(ctx.ball) {
                    ctx.crowd.on_event(CrowdEvent::Edge);
                    ctx.telemetry.track(ctx.now, TelemetryData::EdgeBall { side });
                }
            }
        }

        if step.net {
            ctx.crowd.on_event(CrowdEvent::LuckyNet);
            ctx.telemetry.track(ctx.now, TelemetryData::NetContact);
        }

        let stalled = ctx.now - self.last_hit_at > self.rally_timeout;
        if stalled {
            debug!("Rally stalled after {:.2}s without contact", ctx.now - self.last_hit_at);
            ctx.crowd.on_event(CrowdEvent::Timeout);
            ctx.telemetry.track(ctx.now, TelemetryData::Timeout { player: None });
        }

        RallyTick { step, stalled }
    }

    /// Did the ball land on the table within the edge tolerance?
    fn is_edge_ball(&self, ball: &BallState) -> bool {
        let table = &self.physics.table;
        let p = ball.position;
        table.contains(p)
            && (table.half_width() - p.x.abs() < EDGE_TOLERANCE
                || table.half_length() - p.z.abs() < EDGE_TOLERANCE)
    }

    /// Check whether the point is over.
    ///
    /// Rules are tried in order and the first that applies decides:
    /// out, double contact, wrong side, double bounce, serve fault.
    /// A ball nobody struck yet is charged to `server`.
    pub fn evaluate_outcome(&self, ball: &BallState, server: Side) -> Option<RallyOutcome> {
        if !ball.in_play {
            return None;
        }

        let table = &self.physics.table;
        let at_fault = ball.last_hit_by.unwrap_or(server);
        let lost = |reason| Some(RallyOutcome { winner: at_fault.opponent(), reason });

        if !table.contains(ball.position) {
            return lost(PointReason::Out);
        }
        if ball.contact_count >= 2 {
            return lost(PointReason::DoubleContact);
        }

        match (ball.last_hit_by, ball.last_bounce_side) {
            (Some(striker), Some(bounce)) if bounce == striker => lost(PointReason::WrongSide),
            (Some(striker), Some(bounce)) if ball.bounces_since_strike >= 2 && bounce != striker => {
                Some(RallyOutcome { winner: striker, reason: PointReason::DoubleBounce })
            }
            (None, Some(_)) => lost(PointReason::ServeFault),
            _ => None,
        }
    }

    /// Outcome of a rally that stalled: charged to the last striker, or
    /// to the server when nobody struck.
    pub fn stalled_outcome(&self, ball: &BallState, server: Side) -> RallyOutcome {
        RallyOutcome {
            winner: ball.last_hit_by.unwrap_or(server).opponent(),
            reason: PointReason::Stalled,
        }
    }
}
