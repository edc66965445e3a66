//! Ball / table and ball / net collision resolution.

use crate::config::TableConfig;
use crate::game::state::{BallState, Side};

/// Half-thickness of the slab around the net plane (m).
pub const NET_SLAB: f32 = 0.05;

/// Height tolerance above the net tape (m).
pub const NET_MARGIN: f32 = 0.02;

/// Clearance the ball is lifted to after touching the table (m).
const SURFACE_CLEARANCE: f32 = 0.001;

/// Spin kept after brushing the net.
const NET_SPIN_DAMPING: f32 = 0.7;

/// What happened during one resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BounceOutcome {
    /// Ball bounced off the playing surface
    pub bounced: bool,
    /// Ball touched the net
    pub net_contact: bool,
    /// Half the ball bounced on (only set with `bounced`)
    pub landed_side: Option<Side>,
}

/// Is a point inside the slab occupied by the net?
///
/// Shared with the trajectory predictor so both agree on what a net touch is.
#[inline]
pub fn in_net_slab(x: f32, y: f32, z: f32, table: &TableConfig) -> bool {
    z.abs() < NET_SLAB && y <= table.net_top() + NET_MARGIN && x.abs() <= table.half_width()
}

/// Resolves table and net contacts in place.
///
/// Table and net checks are independent; both may fire in one pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct BounceResolver;

impl BounceResolver {
    /// Resolve contacts for a live ball.
    pub fn resolve(&self, ball: &mut BallState, table: &TableConfig) -> BounceOutcome {
        let mut outcome = BounceOutcome::default();
        if !ball.in_play {
            return outcome;
        }

        if ball.position.y <= table.height {
            ball.position.y = table.height + SURFACE_CLEARANCE;
            ball.velocity.y = -ball.velocity.y * table.bounce_restitution;
            let keep = 1.0 - table.friction;
            ball.velocity.x *= keep;
            ball.velocity.z *= keep;

            let side = Side::from_z(ball.position.z);
            ball.last_bounce_side = Some(side);
            ball.bounces_since_strike = ball.bounces_since_strike.saturating_add(1);

            outcome.bounced = true;
            outcome.landed_side = Some(side);
        }

        // One touch per pass through the slab.
        let in_slab = in_net_slab(ball.position.x, ball.position.y, ball.position.z, table);
        if in_slab && !ball.touching_net {
            ball.velocity.z *= -table.net_elasticity;
            ball.spin *= NET_SPIN_DAMPING;
            outcome.net_contact = true;
        }
        ball.touching_net = in_slab;

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;
    use proptest::prelude::*;

    fn live_ball(position: Vec3, velocity: Vec3) -> BallState {
        let mut ball = BallState::at_rest(position);
        ball.velocity = velocity;
        ball.in_play = true;
        ball
    }

    #[test]
    fn test_table_bounce() {
        let table = TableConfig::default();
        let mut ball = live_ball(Vec3::new(0.1, 0.75, 0.6), Vec3::new(1.0, -3.0, 4.0));

        let outcome = BounceResolver.resolve(&mut ball, &table);

        assert!(outcome.bounced);
        assert!(!outcome.net_contact);
        assert_eq!(outcome.landed_side, Some(Side::B));
        assert_eq!(ball.last_bounce_side, Some(Side::B));
        assert_eq!(ball.bounces_since_strike, 1);
        assert!(ball.position.y > table.height);
        assert!((ball.velocity.y - 3.0 * table.bounce_restitution).abs() < 1e-5);
        assert!((ball.velocity.z - 4.0 * (1.0 - table.friction)).abs() < 1e-5);
    }

    #[test]
    fn test_net_contact_reflects_and_damps() {
        let table = TableConfig::default();
        let mut ball = live_ball(Vec3::new(0.0, 0.85, 0.01), Vec3::new(0.0, 0.0, 5.0));
        ball.spin = Vec3::new(0.0, 0.0, 10.0);

        let outcome = BounceResolver.resolve(&mut ball, &table);

        assert!(outcome.net_contact);
        assert!(!outcome.bounced);
        assert!((ball.velocity.z + 5.0 * table.net_elasticity).abs() < 1e-5);
        assert!((ball.spin.z - 7.0).abs() < 1e-5);
        assert!(ball.touching_net);
    }

    #[test]
    fn test_net_touch_reported_once_per_pass() {
        let table = TableConfig::default();
        let mut ball = live_ball(Vec3::new(0.0, 0.85, -0.02), Vec3::new(0.0, 0.0, 2.0));

        assert!(BounceResolver.resolve(&mut ball, &table).net_contact);
        let rebound = ball.velocity.z;
        assert!(rebound < 0.0);

        // Still inside the slab on the next passes: no second touch.
        ball.position.z = -0.03;
        assert!(!BounceResolver.resolve(&mut ball, &table).net_contact);
        ball.position.z = -0.045;
        assert!(!BounceResolver.resolve(&mut ball, &table).net_contact);
        assert_eq!(ball.velocity.z, rebound);

        // Leaving the slab re-arms the net.
        ball.position.z = -0.2;
        BounceResolver.resolve(&mut ball, &table);
        assert!(!ball.touching_net);
    }

    #[test]
    fn test_ball_over_net_is_untouched() {
        let table = TableConfig::default();
        let mut ball = live_ball(Vec3::new(0.0, 1.2, 0.0), Vec3::new(0.0, 0.0, 5.0));
        let outcome = BounceResolver.resolve(&mut ball, &table);
        assert_eq!(outcome, BounceOutcome::default());
        assert_eq!(ball.velocity.z, 5.0);
    }

    #[test]
    fn test_dead_ball_is_ignored() {
        let table = TableConfig::default();
        let mut ball = BallState::at_rest(Vec3::new(0.0, 0.5, 0.0));
        let outcome = BounceResolver.resolve(&mut ball, &table);
        assert_eq!(outcome, BounceOutcome::default());
        assert_eq!(ball.position.y, 0.5);
    }

    proptest! {
        #[test]
        fn prop_bounce_respects_restitution(
            x in -0.7f32..0.7,
            z in -1.3f32..1.3,
            y in 0.0f32..0.76,
            vy in -20.0f32..0.0,
        ) {
            let table = TableConfig::default();
            let mut ball = live_ball(Vec3::new(x, y, z), Vec3::new(0.0, vy, 0.0));
            let before = ball.velocity.y.abs();

            let outcome = BounceResolver.resolve(&mut ball, &table);

            prop_assert!(outcome.bounced);
            prop_assert!(ball.velocity.y.abs() <= table.bounce_restitution * before + 1e-6);
            prop_assert_eq!(ball.last_bounce_side, Some(Side::from_z(z)));
        }
    }
}
