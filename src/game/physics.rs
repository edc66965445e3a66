//! Ball Dynamics
//!
//! Integrates the live ball one tick at a time: gravity, aerodynamic drag
//! with a little turbulent swirl, and a Magnus term proportional to
//! `spin × velocity`. Contacts are delegated to [`BounceResolver`].

use crate::config::{MatchSettings, TableConfig};
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::game::bounce::{BounceOutcome, BounceResolver};
use crate::game::state::{BallState, Side};

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Magnus coefficient used by the live integrator.
pub const MAGNUS_COEFFICIENT: f32 = 0.0005;

/// Fraction of spin lost per second.
pub const SPIN_DECAY_PER_SECOND: f32 = 0.05;

// =============================================================================
// WIND
// =============================================================================

/// Air density at sea level (kg/m³).
const AIR_DENSITY: f32 = 1.225;
/// Drag coefficient of a sphere.
const DRAG_COEFFICIENT: f32 = 0.47;
/// Cross-section of a 40 mm ball (m²).
const BALL_CROSS_SECTION: f32 = 0.0014;
/// Scale of the turbulent swirl (m/s²).
const SWIRL_SCALE: f32 = 0.05;

/// Aerodynamic drag model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindModel {
    /// Drag multiplier
    pub intensity: f32,
    /// Turbulence in `[0, 1]`; thins the air and adds swirl
    pub turbulence: f32,
}

impl WindModel {
    /// Build from match settings.
    pub fn from_settings(settings: &MatchSettings) -> Self {
        Self {
            intensity: settings.wind_resistance,
            turbulence: settings.humidity,
        }
    }

    /// Drag plus swirl acting on a ball moving at `velocity`.
    ///
    /// Draws three values from `rng` on every call, so the stream stays in
    /// lockstep regardless of ball speed.
    pub fn force(&self, velocity: Vec3, rng: &mut DeterministicRng) -> Vec3 {
        let density = AIR_DENSITY * (1.0 - 0.1 * self.turbulence);
        let speed_sq = velocity.length_squared();
        let magnitude =
            0.5 * density * speed_sq * DRAG_COEFFICIENT * BALL_CROSS_SECTION * self.intensity;
        let drag = -velocity.normalize() * magnitude;

        let swirl = Vec3::new(
            rng.range_f32(-1.0, 1.0),
            rng.range_f32(-0.5, 0.5),
            rng.range_f32(-1.0, 1.0),
        ) * (self.turbulence * SWIRL_SCALE);

        drag + swirl
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Result of one physics step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Ball touched the net
    pub net: bool,
    /// Ball bounced on the table
    pub bounce: bool,
    /// Side of the bounce, if any
    pub side: Option<Side>,
}

impl From<BounceOutcome> for StepOutcome {
    fn from(outcome: BounceOutcome) -> Self {
        Self {
            net: outcome.net_contact,
            bounce: outcome.bounced,
            side: outcome.landed_side,
        }
    }
}

/// Advances the live ball.
#[derive(Clone, Debug)]
pub struct PhysicsEngine {
    /// Table the ball plays on
    pub table: TableConfig,
    /// Air model
    pub wind: WindModel,
    resolver: BounceResolver,
}

impl PhysicsEngine {
    /// Create an engine for a table and atmosphere.
    pub fn new(table: TableConfig, wind: WindModel) -> Self {
        Self {
            table,
            wind,
            resolver: BounceResolver,
        }
    }

    /// Advance `ball` by `dt` seconds and resolve contacts.
    ///
    /// A dead ball is left alone; a `dt` of zero changes nothing.
    pub fn step(&self, ball: &mut BallState, dt: f32, rng: &mut DeterministicRng) -> StepOutcome {
        if !ball.in_play || dt <= 0.0 {
            return StepOutcome::default();
        }

        let drag = self.wind.force(ball.velocity, rng);
        let magnus = ball.spin.cross(ball.velocity) * (MAGNUS_COEFFICIENT * dt);

        ball.velocity += GRAVITY * dt + drag * dt + magnus;
        ball.position += ball.velocity * dt;
        ball.spin *= (1.0 - SPIN_DECAY_PER_SECOND * dt).max(0.0);

        self.resolver.resolve(ball, &self.table).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PhysicsEngine {
        PhysicsEngine::new(
            TableConfig::default(),
            WindModel { intensity: 1.0, turbulence: 0.0 },
        )
    }

    fn live_ball(position: Vec3, velocity: Vec3) -> BallState {
        let mut ball = BallState::at_rest(position);
        ball.velocity = velocity;
        ball.in_play = true;
        ball
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut rng = DeterministicRng::new(1);
        let mut ball = live_ball(Vec3::new(0.0, 1.5, -0.5), Vec3::ZERO);

        let outcome = engine().step(&mut ball, 0.1, &mut rng);

        assert_eq!(outcome, StepOutcome::default());
        assert!((ball.velocity.y + 0.981).abs() < 1e-4);
        assert!(ball.position.y < 1.5);
    }

    #[test]
    fn test_drag_opposes_motion() {
        let mut rng = DeterministicRng::new(1);
        let wind = WindModel { intensity: 1.0, turbulence: 0.0 };
        let force = wind.force(Vec3::new(0.0, 0.0, 10.0), &mut rng);
        assert!(force.z < 0.0);
        assert_eq!(force.x, 0.0);

        let still = wind.force(Vec3::ZERO, &mut rng);
        assert_eq!(still, Vec3::ZERO);
    }

    #[test]
    fn test_topspin_curves_ball() {
        let mut rng = DeterministicRng::new(1);
        let mut plain = live_ball(Vec3::new(0.0, 1.2, -1.0), Vec3::new(0.0, 0.0, 5.0));
        let mut spun = plain.clone();
        spun.spin = Vec3::new(0.0, 30.0, 0.0);

        let engine = engine();
        engine.step(&mut plain, 0.05, &mut rng.clone());
        engine.step(&mut spun, 0.05, &mut rng);

        assert!(spun.velocity.x != plain.velocity.x);
        assert!(spun.spin.y < 30.0);
    }

    #[test]
    fn test_step_reports_bounce() {
        let mut rng = DeterministicRng::new(1);
        let mut ball = live_ball(Vec3::new(0.0, 0.77, 0.8), Vec3::new(0.0, -3.0, 1.0));

        let outcome = engine().step(&mut ball, 1.0 / 60.0, &mut rng);

        assert!(outcome.bounce);
        assert_eq!(outcome.side, Some(Side::B));
        assert!(ball.velocity.y > 0.0);
    }

    #[test]
    fn test_dead_ball_stays_put() {
        let mut rng = DeterministicRng::new(1);
        let mut ball = BallState::at_rest(Vec3::new(0.0, 1.0, 0.0));
        engine().step(&mut ball, 0.5, &mut rng);
        assert_eq!(ball.position, Vec3::new(0.0, 1.0, 0.0));
    }
}
