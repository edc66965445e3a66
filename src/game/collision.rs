//! Racket Collision
//!
//! Decides whether a player's racket can reach the ball and, if it can,
//! computes the struck ball's velocity and spin. This is the only place
//! where strikes change the ball during play.
//!
//! A stroke leaves the racket along a fixed lift (rise per metre of forward
//! speed) and is sped up just enough to carry to the intent's aim point.
//! The stroke's pace, blended from intent power, sweet-spot proximity and
//! focus, then over- or under-hits that carry by a few percent.

use crate::config::TableConfig;
use crate::core::math::clamp;
use crate::core::vec3::Vec3;
use crate::game::physics::GRAVITY;
use crate::game::shot::ShotIntent;
use crate::game::spin::SpinProfile;
use crate::game::state::{BallState, PlayerState};

/// Vertical launch speed per unit of forward speed.
const STRIKE_LIFT: f32 = 0.9;
/// Shallowest target past the net (m).
const MIN_TARGET_DEPTH: f32 = 0.5;
/// Shortest forward carry solved for (m).
const MIN_CARRY: f32 = 0.3;
/// Pace at which a stroke carries exactly to its aim.
const NOMINAL_PACE: f32 = 1.5;
/// Carry speed error per unit of pace away from nominal.
const PACE_SENSITIVITY: f32 = 0.03;
/// Largest carry speed error either way.
const MAX_PACE_ERROR: f32 = 0.03;
/// Stamina spent per unit of shot power.
const STRIKE_STAMINA_COST: f32 = 0.005;

/// Racket/ball contact model.
#[derive(Clone, Copy, Debug, Default)]
pub struct RacketCollisionSystem;

impl RacketCollisionSystem {
    /// Where the player's racket sits when waiting for the ball.
    pub fn racket_position(&self, player: &PlayerState, table: &TableConfig) -> Vec3 {
        let side = player.id.sign();
        Vec3::new(
            0.2 * side + player.lateral_offset,
            table.height + 0.15,
            0.4 * side,
        )
    }

    /// Reach of the racket, longer when fresh.
    #[inline]
    pub fn effective_reach(&self, player: &PlayerState) -> f32 {
        player.reach + 0.3 * player.stamina
    }

    /// Can the player's racket get to the ball right now?
    pub fn in_reach(&self, ball: &BallState, player: &PlayerState, table: &TableConfig) -> bool {
        ball.position.distance(self.racket_position(player, table)) <= self.effective_reach(player)
    }

    /// Landing point a stroke aims for.
    ///
    /// `aim.z` is read as depth past the net and `aim.x` as the lateral
    /// target; both are pulled inside the opponent's half by the intent's
    /// safe margin.
    pub fn target_point(&self, player: &PlayerState, intent: &ShotIntent, table: &TableConfig) -> Vec3 {
        let margin = intent.safe_margin.max(0.0);
        let max_depth = (table.half_length() - margin).max(MIN_TARGET_DEPTH);
        let depth = clamp(intent.aim.z.abs(), MIN_TARGET_DEPTH, max_depth);
        let lateral = (table.half_width() - margin).max(0.0);
        Vec3::new(
            clamp(intent.aim.x, -lateral, lateral),
            table.height,
            depth * player.id.forward(),
        )
    }

    /// Try to strike the ball.
    ///
    /// Returns `false` and leaves everything untouched when the ball is out
    /// of reach.
    pub fn try_hit_ball(
        &self,
        ball: &mut BallState,
        player: &mut PlayerState,
        intent: &ShotIntent,
        table: &TableConfig,
    ) -> bool {
        if !self.in_reach(ball, player, table) {
            return false;
        }
        let distance = ball.position.distance(self.racket_position(player, table));

        let power = clamp(intent.power, ShotIntent::MIN_POWER, ShotIntent::MAX_POWER);
        let sweet_spot = clamp(player.racket_sweet_spot - 0.05 * distance, 0.4, 1.0);
        let focus_boost = clamp(player.focus * 0.3, 0.0, 0.3);
        let pace = power * (0.7 + sweet_spot + focus_boost);
        let error = clamp(PACE_SENSITIVITY * (pace - NOMINAL_PACE), -MAX_PACE_ERROR, MAX_PACE_ERROR);

        let target = self.target_point(player, intent, table);
        let launch = launch_velocity(
            ball.position,
            target,
            player.id.forward(),
            intent.style.extra_lift(),
        );

        let rpm = 50.0 + 300.0 * player.spin_control + 100.0 * power;

        ball.velocity = launch * (1.0 + error);
        ball.spin = SpinProfile::new(intent.spin, rpm).angular_velocity();
        ball.contact_count = if ball.last_hit_by == Some(player.id) {
            ball.contact_count.saturating_add(1)
        } else {
            1
        };
        ball.last_hit_by = Some(player.id);
        ball.last_bounce_side = None;
        ball.bounces_since_strike = 0;
        ball.in_play = true;

        player.exert(STRIKE_STAMINA_COST * power);
        true
    }
}

/// Launch velocity from `from` that lands on `target` in a vacuum.
///
/// Vertical speed is `STRIKE_LIFT · vz + extra_lift`; the forward speed `vz`
/// is the positive root of
/// `(drop + lift·carry)·vz² + extra_lift·carry·vz − g·carry²/2 = 0`.
fn launch_velocity(from: Vec3, target: Vec3, forward: f32, extra_lift: f32) -> Vec3 {
    let g = -GRAVITY.y;
    let carry = ((target.z - from.z) * forward).max(MIN_CARRY);
    let drop = (from.y - target.y).max(0.0);

    let a = drop + STRIKE_LIFT * carry;
    let b = extra_lift * carry;
    let c = 0.5 * g * carry * carry;
    let vz = (-b + (b * b + 4.0 * a * c).sqrt()) / (2.0 * a);
    let flight = carry / vz;

    Vec3::new(
        (target.x - from.x) / flight,
        STRIKE_LIFT * vz + extra_lift,
        vz * forward,
    )
}
