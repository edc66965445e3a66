//! Match Controller
//!
//! Owns the whole match and drives it one frame at a time. Every system is
//! lent exactly what it needs for one sub-step; nothing else holds state.
//!
//! Sub-step order:
//!
//! 1. Advance the simulated clock, apply the human side's timeout and
//!    move requests
//! 2. Phase handler (toss, serve strike, rally returns or timeout break)
//! 3. While the ball is live: physics, rally bookkeeping, point rules
//! 4. Crowd decay

use tracing::{debug, info, warn};

use crate::config::{ConfigError, MatchSettings, TableConfig};
use crate::core::math::clamp;
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::game::ai::{AiMode, AiPolicy, AiStateMachine};
use crate::game::collision::RacketCollisionSystem;
use crate::game::crowd::{CrowdEvent, CrowdSystem};
use crate::game::events::{TelemetryData, TelemetryEvent, TelemetryRecorder};
use crate::game::fatigue::FatigueModel;
use crate::game::input::{InputIntent, InputKind, InputQueue};
use crate::game::prediction::PredictionEngine;
use crate::game::rally::{RallyContext, RallyOrchestrator, RallyOutcome};
use crate::game::score::ScoreSystem;
use crate::game::serve::{serve_position, ServeSystem};
use crate::game::shot::ShotIntent;
use crate::game::snapshot::RallySnapshot;
use crate::game::state::{BallState, PerSide, PlayerState, RallyPhase, Side};

/// Most sub-steps taken inside one `tick`.
pub const MAX_SUBSTEPS: u32 = 8;

/// Seconds an AI server waits before tossing.
pub const AI_TOSS_DELAY: f32 = 1.0;

/// What happens when a timeout break ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    /// Continue the interrupted phase
    Phase(RallyPhase),
    /// The rally stalled; decide the point
    Stalled,
}

#[derive(Clone, Copy, Debug)]
struct Pause {
    remaining: f32,
    resume: Resume,
}

/// Top-level match state and frame driver.
pub struct MatchController {
    table: TableConfig,
    settings: MatchSettings,

    ball: BallState,
    players: PerSide<PlayerState>,
    phase: RallyPhase,
    phase_started_at: f32,
    pause: Option<Pause>,
    clock: f32,

    queue: InputQueue,
    crowd: CrowdSystem,
    telemetry: TelemetryRecorder,
    fatigue: FatigueModel,
    score: ScoreSystem,
    rally: RallyOrchestrator,
    serve: ServeSystem,
    racket: RacketCollisionSystem,
    predictor: PredictionEngine,
    ai: PerSide<AiStateMachine>,

    physics_rng: DeterministicRng,
    ai_rng: DeterministicRng,
}

impl MatchController {
    /// Create a match. Both configuration records are validated up front.
    pub fn new(
        table: TableConfig,
        settings: MatchSettings,
        name_a: impl Into<String>,
        name_b: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        table.validate()?;
        settings.validate()?;

        let players = PerSide::new(
            PlayerState::new(Side::A, name_a, &settings),
            PlayerState::new(Side::B, name_b, &settings),
        );

        info!(
            "Match created: {} vs {} ({} AI, seed {})",
            players.a.name, players.b.name, settings.ai_difficulty, settings.rng_seed
        );

        Ok(Self {
            ball: BallState::at_rest(serve_position(&table, Side::A)),
            players,
            phase: RallyPhase::ServePreparation,
            phase_started_at: 0.0,
            pause: None,
            clock: 0.0,
            queue: InputQueue::new(),
            crowd: CrowdSystem::new(),
            telemetry: TelemetryRecorder::new(),
            fatigue: FatigueModel,
            score: ScoreSystem::new(&settings),
            rally: RallyOrchestrator::new(table.clone(), &settings),
            serve: ServeSystem,
            racket: RacketCollisionSystem,
            predictor: PredictionEngine,
            ai: PerSide::from_fn(|_| AiStateMachine::new(settings.ai_difficulty)),
            physics_rng: DeterministicRng::for_stream(settings.rng_seed, b"physics"),
            ai_rng: DeterministicRng::for_stream(settings.rng_seed, b"ai"),
            table,
            settings,
        })
    }

    // =========================================================================
    // EXTERNAL INTERFACE
    // =========================================================================

    /// Queue an intent for the human side.
    pub fn enqueue_input(&mut self, intent: InputIntent) {
        self.queue.push(intent);
    }

    /// Advance the match by `delta_seconds`.
    ///
    /// Negative or non-finite deltas do nothing. Long deltas are split into
    /// equal sub-steps no longer than `max_substep_seconds`; time beyond
    /// [`MAX_SUBSTEPS`] sub-steps is dropped.
    pub fn tick(&mut self, delta_seconds: f32) {
        if self.phase == RallyPhase::MatchOver {
            return;
        }
        if !(delta_seconds.is_finite() && delta_seconds > 0.0) {
            return;
        }

        let max_step = self.settings.max_substep_seconds;
        let mut steps = (delta_seconds / max_step).ceil().max(1.0) as u32;
        let mut budget = delta_seconds;
        if steps > MAX_SUBSTEPS {
            warn!(
                "Frame delta {:.3}s exceeds {} sub-steps, dropping {:.3}s",
                delta_seconds,
                MAX_SUBSTEPS,
                delta_seconds - max_step * MAX_SUBSTEPS as f32
            );
            steps = MAX_SUBSTEPS;
            budget = max_step * MAX_SUBSTEPS as f32;
        }

        let dt = budget / steps as f32;
        for _ in 0..steps {
            self.step(dt);
            if self.phase == RallyPhase::MatchOver {
                break;
            }
        }
    }

    /// Current state by value.
    pub fn snapshot(&self) -> RallySnapshot {
        let score = self.score.snapshot();
        RallySnapshot {
            phase: self.phase,
            ball: self.ball.clone(),
            players: self.players.clone(),
            serving: score.serving,
            rally_count: self.rally.rally_count(),
            game_score: score.game,
            match_score: score.games,
            timeouts_remaining: score.timeouts_remaining,
            crowd: self.crowd.snapshot(),
            clock: self.clock,
        }
    }

    /// Call a timeout for `side`.
    ///
    /// Fails when the side has none left or the match is over. Calling one
    /// during a break restarts the break.
    pub fn call_timeout(&mut self, side: Side) -> bool {
        if self.phase == RallyPhase::MatchOver {
            return false;
        }
        if !self.score.call_timeout(side) {
            debug!("Timeout refused for {}: none left", side);
            return false;
        }

        info!("Timeout called by {}", side);
        self.crowd.on_event(CrowdEvent::Timeout);
        self.telemetry.track(self.clock, TelemetryData::Timeout { player: Some(side) });

        let resume = match self.pause.take() {
            Some(pause) => pause.resume,
            None => Resume::Phase(self.phase),
        };
        self.pause = Some(Pause {
            remaining: self.settings.timeout_break_seconds,
            resume,
        });
        self.set_phase(RallyPhase::Timeout);
        true
    }

    /// Make `side` strike the ball now with `intent`, regardless of whose
    /// turn it is. Returns `false` when out of reach or the match is over.
    pub fn force_hit(&mut self, side: Side, intent: ShotIntent) -> bool {
        if self.phase == RallyPhase::MatchOver {
            return false;
        }
        if !self.strike(side, &intent, self.clock) {
            return false;
        }
        self.pause = None;
        if self.phase != RallyPhase::Rally {
            self.set_phase(RallyPhase::Rally);
        }
        true
    }

    /// Drain buffered telemetry.
    pub fn take_telemetry(&mut self) -> Vec<TelemetryEvent> {
        self.telemetry.flush()
    }

    /// Replace the AI policy of one side.
    pub fn set_ai_policy(&mut self, side: Side, policy: AiPolicy) {
        self.ai[side] = AiStateMachine::with_policy(policy);
    }

    /// Current AI mode of a side.
    pub fn ai_mode(&self, side: Side) -> AiMode {
        self.ai[side].mode()
    }

    /// Current phase.
    pub fn phase(&self) -> RallyPhase {
        self.phase
    }

    /// Simulated seconds since match start.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Match settings.
    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Table in use.
    pub fn table(&self) -> &TableConfig {
        &self.table
    }

    /// Match winner, once decided.
    pub fn winner(&self) -> Option<Side> {
        self.score.match_winner()
    }

    // =========================================================================
    // SUB-STEP
    // =========================================================================

    fn step(&mut self, dt: f32) {
        self.clock += dt;
        let now = self.clock;

        self.apply_human_requests();

        match self.phase {
            RallyPhase::ServePreparation => self.update_serve_preparation(now),
            RallyPhase::Serve => self.update_serve(now),
            RallyPhase::Rally => self.update_returns(now),
            RallyPhase::Timeout => self.update_timeout(dt, now),
            RallyPhase::MatchOver => {}
        }

        if self.phase.is_live() {
            self.advance_ball(dt, now);
        }

        self.crowd.decay(dt);

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(
            clock = self.clock,
            phase = ?self.phase,
            position = %self.ball.position,
            velocity = %self.ball.velocity,
            "sub-step"
        );
    }

    fn apply_human_requests(&mut self) {
        let Some(side) = self.settings.human_side else {
            return;
        };

        if self.queue.consume(InputKind::Timeout).is_some() {
            self.call_timeout(side);
        }

        if let Some(InputIntent::Move { delta }) = self.queue.consume(InputKind::Move) {
            let limit = self.table.half_width();
            let player = &mut self.players[side];
            player.lateral_offset = clamp(player.lateral_offset + delta.x, -limit, limit);
        }
    }

    fn is_human(&self, side: Side) -> bool {
        self.settings.human_side == Some(side)
    }

    fn take_human_swing(&mut self) -> Option<ShotIntent> {
        self.queue.consume(InputKind::Swing).and_then(|intent| intent.to_shot())
    }

    fn update_serve_preparation(&mut self, now: f32) {
        let server = self.score.serving();

        let toss = if self.is_human(server) {
            match self.queue.consume(InputKind::ServeToss) {
                Some(InputIntent::ServeToss { direction, strength }) => Some((direction, strength)),
                _ => None,
            }
        } else if now - self.phase_started_at >= AI_TOSS_DELAY {
            Some((Vec3::new(0.0, 0.0, server.forward()), 1.0))
        } else {
            None
        };

        if let Some((direction, strength)) = toss {
            self.ball = BallState::at_rest(serve_position(&self.table, server));
            self.serve.prepare_toss(&mut self.ball, direction, strength);
            self.rally.reset_rally(now);
            self.telemetry.track(now, TelemetryData::ServeTossed { server });
            self.set_phase(RallyPhase::Serve);
        }
    }

    fn update_serve(&mut self, now: f32) {
        let server = self.score.serving();

        let intent = if self.is_human(server) {
            self.take_human_swing()
        } else if self.ball.velocity.y <= 0.0
            && self.racket.in_reach(&self.ball, &self.players[server], &self.table)
        {
            Some(self.ai_intent(server, now))
        } else {
            None
        };

        if let Some(intent) = intent {
            if self.strike(server, &intent, now) {
                self.set_phase(RallyPhase::Rally);
            }
        }
    }

    fn update_returns(&mut self, now: f32) {
        let Some(striker) = self.ball.last_hit_by else {
            return;
        };
        let receiver = striker.opponent();
        if self.ball.last_bounce_side != Some(receiver) {
            return;
        }

        // A swing queued while the ball is out of reach stays queued.
        if !self.racket.in_reach(&self.ball, &self.players[receiver], &self.table) {
            return;
        }

        let intent = if self.is_human(receiver) {
            self.take_human_swing()
        } else {
            Some(self.ai_intent(receiver, now))
        };

        if let Some(intent) = intent {
            self.strike(receiver, &intent, now);
        }
    }

    fn update_timeout(&mut self, dt: f32, now: f32) {
        for side in Side::BOTH {
            self.fatigue.recover(&mut self.players[side], dt);
        }

        let Some(pause) = self.pause.as_mut() else {
            self.set_phase(RallyPhase::ServePreparation);
            return;
        };
        pause.remaining -= dt;
        if pause.remaining > 0.0 {
            return;
        }

        let resume = pause.resume;
        self.pause = None;
        match resume {
            Resume::Phase(phase) => {
                self.rally.restart_timer(now);
                self.set_phase(phase);
            }
            Resume::Stalled => {
                let outcome = self.rally.stalled_outcome(&self.ball, self.score.serving());
                self.resolve_point(outcome);
            }
        }
    }

    fn advance_ball(&mut self, dt: f32, now: f32) {
        let mut ctx = RallyContext {
            ball: &mut self.ball,
            players: &mut self.players,
            crowd: &mut self.crowd,
            telemetry: &mut self.telemetry,
            rng: &mut self.physics_rng,
            now,
        };
        let tick = self.rally.update(&mut ctx, dt);

        if tick.stalled {
            self.pause = Some(Pause {
                remaining: self.settings.timeout_break_seconds,
                resume: Resume::Stalled,
            });
            self.set_phase(RallyPhase::Timeout);
            return;
        }

        if let Some(outcome) = self.rally.evaluate_outcome(&self.ball, self.score.serving()) {
            self.resolve_point(outcome);
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn ai_intent(&mut self, side: Side, now: f32) -> ShotIntent {
        let prediction = self.predictor.predict_landing(&self.ball, &self.table);
        self.ai[side].decide_intent(
            &self.ball,
            &self.players[side],
            &prediction,
            self.rally.rally_count(),
            now,
            &mut self.ai_rng,
        )
    }

    fn strike(&mut self, side: Side, intent: &ShotIntent, now: f32) -> bool {
        let hit = self
            .racket
            .try_hit_ball(&mut self.ball, &mut self.players[side], intent, &self.table);
        if hit {
            self.rally.register_hit(now);
            self.telemetry.track(
                now,
                TelemetryData::Strike {
                    player: side,
                    style: intent.style,
                    power: intent.power,
                },
            );
        }
        hit
    }

    fn resolve_point(&mut self, outcome: RallyOutcome) {
        let now = self.clock;
        let winner = outcome.winner;
        let ace = self.rally.strikes() == 1 && self.ball.last_hit_by == Some(winner);

        let award = self.score.award_point(winner);
        self.players[winner].score += 1;

        if ace {
            self.crowd.on_event(CrowdEvent::Ace);
        }

        let board = self.score.snapshot();
        info!(
            "Point to {} ({:?}) after {} bounces - game {}-{}, games {}-{}",
            winner,
            outcome.reason,
            self.rally.rally_count(),
            board.game.a,
            board.game.b,
            board.games.a,
            board.games.b
        );
        self.telemetry.track(now, TelemetryData::PointOver { winner, reason: outcome.reason });

        if award.game_won {
            info!("Game to {}", winner);
            self.telemetry.track(now, TelemetryData::GameWon { winner });
        }
        if award.match_won {
            info!("Match to {} ({})", winner, self.players[winner].name);
            self.telemetry.track(now, TelemetryData::MatchWon { winner });
        }

        self.ball = BallState::at_rest(self.settings.neutral_ball_position);
        self.rally.reset_rally(now);
        self.queue.clear();
        self.pause = None;

        self.set_phase(if award.match_won {
            RallyPhase::MatchOver
        } else {
            RallyPhase::ServePreparation
        });
    }

    fn set_phase(&mut self, phase: RallyPhase) {
        if phase != self.phase {
            debug!("Phase {:?} -> {:?} at {:.3}s", self.phase, phase, self.clock);
        }
        self.phase = phase;
        self.phase_started_at = self.clock;
    }
}
