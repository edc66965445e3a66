//! Match State Definitions
//!
//! Ball, player and phase types shared by every simulation system.

use std::fmt;
use std::ops::{Index, IndexMut};
use serde::{Serialize, Deserialize};

use crate::config::MatchSettings;
use crate::core::hash::StateHasher;
use crate::core::math::clamp01;
use crate::core::vec3::Vec3;
use crate::game::shot::ShotStyle;

// =============================================================================
// SIDE
// =============================================================================

/// One end of the table. Side A owns `z <= 0`, side B owns `z > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Near end (negative z)
    A = 0,
    /// Far end (positive z)
    B = 1,
}

impl Side {
    /// Both sides in order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Side owning a position along the net-perpendicular axis.
    #[inline]
    pub fn from_z(z: f32) -> Side {
        if z <= 0.0 {
            Side::A
        } else {
            Side::B
        }
    }

    /// Sign of z on this side's half.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::A => -1.0,
            Side::B => 1.0,
        }
    }

    /// Direction of play toward the opponent along z.
    #[inline]
    pub fn forward(self) -> f32 {
        -self.sign()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// A value held once per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// Value for side A
    #[serde(rename = "A")]
    pub a: T,
    /// Value for side B
    #[serde(rename = "B")]
    pub b: T,
}

impl<T> PerSide<T> {
    /// Create from both values.
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Build each value from its side.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            a: f(Side::A),
            b: f(Side::B),
        }
    }

    /// Get both values mutably, `side` first.
    pub fn pair_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        match side {
            Side::A => (&mut self.a, &mut self.b),
            Side::B => (&mut self.b, &mut self.a),
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

// =============================================================================
// BALL STATE
// =============================================================================

/// The single live ball of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Position (m)
    pub position: Vec3,

    /// Velocity (m/s)
    pub velocity: Vec3,

    /// Angular velocity (rad/s)
    pub spin: Vec3,

    /// Consecutive racket contacts by `last_hit_by`
    pub contact_count: u8,

    /// Last player to strike the ball
    pub last_hit_by: Option<Side>,

    /// Is the ball live (tossed or struck, point not yet resolved)?
    pub in_play: bool,

    /// Half of the table the ball last bounced on
    pub last_bounce_side: Option<Side>,

    /// Table bounces since the last strike
    pub bounces_since_strike: u8,

    /// Ball is inside the net slab after touching the net
    #[serde(default)]
    pub touching_net: bool,
}

impl BallState {
    /// A dead ball resting at `position`.
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            spin: Vec3::ZERO,
            contact_count: 0,
            last_hit_by: None,
            in_play: false,
            last_bounce_side: None,
            bounces_since_strike: 0,
            touching_net: false,
        }
    }

    /// Hash this ball's state.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec3(self.position);
        hasher.update_vec3(self.velocity);
        hasher.update_vec3(self.spin);
        hasher.update_u8(self.contact_count);
        hasher.update_u8(side_tag(self.last_hit_by));
        hasher.update_bool(self.in_play);
        hasher.update_u8(side_tag(self.last_bounce_side));
        hasher.update_u8(self.bounces_since_strike);
        hasher.update_bool(self.touching_net);
    }
}

fn side_tag(side: Option<Side>) -> u8 {
    match side {
        None => 0,
        Some(Side::A) => 1,
        Some(Side::B) => 2,
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// Dominant hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Handedness {
    /// Left-handed
    Left,
    /// Right-handed
    Right,
}

/// State of one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Which end this player defends
    pub id: Side,
    /// Display name
    pub name: String,
    /// Points won over the whole match
    pub score: u32,
    /// Stamina in `[0, 1]`
    pub stamina: f32,
    /// Focus in `[0, 1]`
    pub focus: f32,
    /// Dominant hand
    pub hand: Handedness,
    /// Read of the opponent's shot
    pub anticipation: f32,
    /// Seconds to react to a new ball
    pub reaction_time: f32,
    /// Stamina lost per bounce per rally-length unit
    pub fatigue_rate: f32,
    /// Sweet-spot quality of the racket
    pub racket_sweet_spot: f32,
    /// Base reach (m)
    pub reach: f32,
    /// Racket face angle (degrees)
    pub paddle_angle: f32,
    /// Spin-control skill in `[0, 1]`
    pub spin_control: f32,
    /// Strokes this player leans on
    pub preferred_styles: Vec<ShotStyle>,
    /// Lateral shift of the racket from the default stance (m)
    pub lateral_offset: f32,
}

impl PlayerState {
    /// Create a player tuned to the match difficulty.
    pub fn new(id: Side, name: impl Into<String>, settings: &MatchSettings) -> Self {
        let stamina = settings.ai_difficulty.base_stamina();
        Self {
            id,
            name: name.into(),
            score: 0,
            stamina,
            focus: stamina - 0.1,
            hand: match id {
                Side::A => Handedness::Left,
                Side::B => Handedness::Right,
            },
            anticipation: 0.6,
            reaction_time: 0.35,
            fatigue_rate: 0.02,
            racket_sweet_spot: 0.8,
            reach: 0.6,
            paddle_angle: 15.0,
            spin_control: 0.5,
            preferred_styles: vec![ShotStyle::Drive, ShotStyle::Block],
            lateral_offset: 0.0,
        }
    }

    /// Spend stamina, keeping both meters in range.
    pub fn exert(&mut self, amount: f32) {
        self.stamina = clamp01(self.stamina - amount);
        self.focus = clamp01(self.focus);
    }

    /// Hash this player's state.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.id as u8);
        hasher.update_str(&self.name);
        hasher.update_u32(self.score);
        hasher.update_f32(self.stamina);
        hasher.update_f32(self.focus);
        hasher.update_f32(self.lateral_offset);
    }
}

// =============================================================================
// RALLY PHASE
// =============================================================================

/// Current phase of play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RallyPhase {
    /// Waiting for the server to toss
    #[default]
    ServePreparation,
    /// Ball tossed, waiting for the serve strike
    Serve,
    /// Ball in open play
    Rally,
    /// Play suspended (called timeout or stalled rally)
    Timeout,
    /// A side has won the match
    MatchOver,
}

impl RallyPhase {
    /// Is the ball being simulated in this phase?
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, RallyPhase::Serve | RallyPhase::Rally)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiDifficulty;

    #[test]
    fn test_side_geometry() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::from_z(-0.3), Side::A);
        assert_eq!(Side::from_z(0.0), Side::A);
        assert_eq!(Side::from_z(0.01), Side::B);
        assert_eq!(Side::A.forward(), 1.0);
        assert_eq!(Side::B.forward(), -1.0);
    }

    #[test]
    fn test_per_side_indexing() {
        let mut scores = PerSide::new(3u32, 5u32);
        scores[Side::B] += 1;
        assert_eq!(scores[Side::A], 3);
        assert_eq!(scores[Side::B], 6);

        let (b, a) = scores.pair_mut(Side::B);
        *b = 0;
        *a = 9;
        assert_eq!(scores, PerSide::new(9, 0));
    }

    #[test]
    fn test_player_factory_scales_with_difficulty() {
        let casual = MatchSettings {
            ai_difficulty: AiDifficulty::Casual,
            ..MatchSettings::default()
        };
        let master = MatchSettings {
            ai_difficulty: AiDifficulty::Master,
            ..MatchSettings::default()
        };

        let weak = PlayerState::new(Side::A, "Ana", &casual);
        let strong = PlayerState::new(Side::B, "Bo", &master);

        assert!((weak.stamina - 0.6).abs() < 1e-6);
        assert!((weak.focus - 0.5).abs() < 1e-6);
        assert!((strong.stamina - 0.9).abs() < 1e-6);
        assert_eq!(weak.hand, Handedness::Left);
        assert_eq!(strong.hand, Handedness::Right);
    }

    #[test]
    fn test_exert_clamps() {
        let mut player = PlayerState::new(Side::A, "Ana", &MatchSettings::default());
        player.exert(5.0);
        assert_eq!(player.stamina, 0.0);
    }

    #[test]
    fn test_ball_at_rest() {
        let ball = BallState::at_rest(Vec3::new(0.0, 1.0, 0.0));
        assert!(!ball.in_play);
        assert_eq!(ball.last_hit_by, None);
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_phase_liveness() {
        assert!(RallyPhase::Serve.is_live());
        assert!(RallyPhase::Rally.is_live());
        assert!(!RallyPhase::Timeout.is_live());
        assert!(!RallyPhase::ServePreparation.is_live());
    }
}
