//! Serve mechanics: the toss and a stand-alone serve strike.

use crate::config::TableConfig;
use crate::core::math::clamp;
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::game::shot::ShotStyle;
use crate::game::spin::{SpinProfile, SpinType};
use crate::game::state::{BallState, PlayerState, Side};

/// Height of the toss start above the surface (m).
const SERVE_HEIGHT: f32 = 0.15;

/// Where `side` holds the ball before tossing it.
pub fn serve_position(table: &TableConfig, side: Side) -> Vec3 {
    Vec3::new(
        0.0,
        table.height + SERVE_HEIGHT,
        side.sign() * table.length * 0.25,
    )
}

/// Toss and serve-strike operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServeSystem;

impl ServeSystem {
    /// Throw the ball up: a small nudge along `direction` plus an upward
    /// component scaled by `strength` (clamped to `[0.5, 2]`).
    pub fn prepare_toss(&self, ball: &mut BallState, direction: Vec3, strength: f32) {
        let upward = clamp(strength, 0.5, 2.0) * 3.0;
        let mut velocity = direction.normalize() * 0.1;
        velocity.y = upward;

        ball.velocity = velocity;
        ball.spin = Vec3::ZERO;
        ball.in_play = true;
        ball.last_hit_by = None;
        ball.contact_count = 0;
        ball.last_bounce_side = None;
        ball.bounces_since_strike = 0;
        ball.touching_net = false;
    }

    /// Strike a serve directly from player attributes.
    ///
    /// The serve stroke gets a higher base speed than any other style;
    /// stamina scales it and the player's control sets the spin rate.
    pub fn strike_serve(
        &self,
        ball: &mut BallState,
        player: &PlayerState,
        style: ShotStyle,
        spin: SpinType,
        rng: &mut DeterministicRng,
    ) {
        let is_serve = style == ShotStyle::Serve;
        let base = if is_serve { 8.0 } else { 6.0 };
        let control = 0.5 * player.spin_control + 0.5 * player.focus;

        let direction = Vec3::new(
            rng.range_f32(-0.1, 0.1),
            rng.range_f32(0.05, 0.1),
            player.id.forward() * if is_serve { 1.0 } else { 0.8 },
        );
        let power = base * clamp(player.stamina + 0.3, 0.3, 1.2);

        ball.velocity = direction.normalize() * power;
        ball.spin = SpinProfile::new(spin, 80.0 + 400.0 * control).angular_velocity();
        ball.last_hit_by = Some(player.id);
        ball.in_play = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchSettings;

    #[test]
    fn test_serve_position_per_side() {
        let table = TableConfig::default();
        let a = serve_position(&table, Side::A);
        let b = serve_position(&table, Side::B);
        assert!(a.z < 0.0 && b.z > 0.0);
        assert!((a.z + 0.685).abs() < 1e-6);
        assert!((a.y - 0.91).abs() < 1e-6);
    }

    #[test]
    fn test_toss_resets_ball() {
        let mut ball = BallState::at_rest(Vec3::ZERO);
        ball.spin = Vec3::new(1.0, 2.0, 3.0);
        ball.last_hit_by = Some(Side::B);
        ball.contact_count = 2;

        ServeSystem.prepare_toss(&mut ball, Vec3::new(0.0, 0.0, 1.0), 10.0);

        assert!(ball.in_play);
        assert_eq!(ball.spin, Vec3::ZERO);
        assert_eq!(ball.last_hit_by, None);
        assert_eq!(ball.contact_count, 0);
        assert_eq!(ball.velocity.y, 6.0);
        assert!((ball.velocity.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_weak_toss_is_clamped() {
        let mut ball = BallState::at_rest(Vec3::ZERO);
        ServeSystem.prepare_toss(&mut ball, Vec3::ZERO, 0.0);
        assert_eq!(ball.velocity.y, 1.5);
        assert_eq!(ball.velocity.x, 0.0);
    }

    #[test]
    fn test_strike_serve_heads_to_opponent() {
        let settings = MatchSettings::default();
        let server = PlayerState::new(Side::B, "Bo", &settings);
        let mut rng = DeterministicRng::new(7);
        let mut ball = BallState::at_rest(Vec3::ZERO);

        ServeSystem.strike_serve(&mut ball, &server, ShotStyle::Serve, SpinType::Back, &mut rng);

        assert_eq!(ball.last_hit_by, Some(Side::B));
        assert!(ball.velocity.z < 0.0);
        assert!(ball.spin.z < 0.0);
        // stamina 0.8 -> 8 * 1.1
        assert!((ball.velocity.length() - 8.8).abs() < 1e-3);
    }

    #[test]
    fn test_serve_style_is_faster() {
        let settings = MatchSettings::default();
        let server = PlayerState::new(Side::A, "Ana", &settings);
        let mut ball_serve = BallState::at_rest(Vec3::ZERO);
        let mut ball_drive = BallState::at_rest(Vec3::ZERO);

        ServeSystem.strike_serve(&mut ball_serve, &server, ShotStyle::Serve, SpinType::None, &mut DeterministicRng::new(1));
        ServeSystem.strike_serve(&mut ball_drive, &server, ShotStyle::Drive, SpinType::None, &mut DeterministicRng::new(1));

        assert!(ball_serve.velocity.length() > ball_drive.velocity.length());
    }
}
