//! Shot styles and the intent handed to the racket model.

use serde::{Serialize, Deserialize};

use crate::core::math::clamp;
use crate::core::vec3::Vec3;
use crate::game::spin::SpinType;

/// Stroke family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ShotStyle {
    /// Overhead kill shot
    Smash = 0,
    /// Short wrist flick over the table
    Flick = 1,
    /// Standard attacking drive
    #[default]
    Drive = 2,
    /// Defensive backspin stroke
    Chop = 3,
    /// Serve stroke
    Serve = 4,
    /// High defensive lob
    Lob = 5,
    /// Passive block
    Block = 6,
}

impl ShotStyle {
    /// Extra vertical speed (m/s) added on top of the racket lift.
    pub fn extra_lift(self) -> f32 {
        match self {
            ShotStyle::Smash => 2.0,
            ShotStyle::Lob => 3.0,
            _ => 0.0,
        }
    }
}

/// A fully specified stroke: what the racket model executes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotIntent {
    /// Stroke family
    pub style: ShotStyle,
    /// Spin category
    pub spin: SpinType,
    /// Target point: `x` lateral, `|z|` depth past the net (m)
    pub aim: Vec3,
    /// Power multiplier in `[MIN_POWER, MAX_POWER]`
    pub power: f32,
    /// Margin kept from the lines
    pub safe_margin: f32,
}

impl ShotIntent {
    /// Lowest accepted power.
    pub const MIN_POWER: f32 = 0.4;
    /// Highest accepted power.
    pub const MAX_POWER: f32 = 1.3;
    /// Power used when a stroke does not specify one.
    pub const DEFAULT_POWER: f32 = 0.8;

    /// Intent with default power and margin.
    pub fn new(style: ShotStyle, spin: SpinType) -> Self {
        Self {
            style,
            spin,
            aim: Vec3::ZERO,
            power: Self::DEFAULT_POWER,
            safe_margin: 0.1,
        }
    }

    /// Builder: set power (clamped).
    pub fn with_power(mut self, power: f32) -> Self {
        self.power = clamp(power, Self::MIN_POWER, Self::MAX_POWER);
        self
    }

    /// Builder: set aim point.
    pub fn with_aim(mut self, aim: Vec3) -> Self {
        self.aim = aim;
        self
    }
}

impl Default for ShotIntent {
    fn default() -> Self {
        Self::new(ShotStyle::Drive, SpinType::None)
    }
}
