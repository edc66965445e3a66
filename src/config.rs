//! Match Configuration
//!
//! Table geometry and match rules, supplied once when a match is created and
//! immutable afterwards.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;
use crate::game::state::Side;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A table dimension is zero, negative or not finite.
    #[error("table {field} must be a positive finite number, got {value}")]
    InvalidDimension {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// A coefficient is outside its allowed range.
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: f32,
        /// Lowest accepted value
        min: f32,
        /// Highest accepted value
        max: f32,
    },

    /// A count that has to be at least one was zero.
    #[error("{field} must be at least 1")]
    ZeroCount {
        /// Offending field
        field: &'static str,
    },

    /// Neutral ball position is not a finite point.
    #[error("neutral ball position must be finite")]
    NonFiniteNeutralPosition,

    /// Difficulty name not recognised.
    #[error("unknown AI difficulty '{0}' (expected casual, pro or master)")]
    UnknownDifficulty(String),
}

// =============================================================================
// TABLE
// =============================================================================

/// Playing surface material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceMaterial {
    /// Tournament acrylic top
    #[default]
    Acrylic,
    /// Club wooden top (livelier bounce)
    Wood,
    /// Outdoor concrete table (dead, grippy)
    Concrete,
}

impl SurfaceMaterial {
    /// (restitution, friction) preset for this surface.
    pub fn bounce_preset(self) -> (f32, f32) {
        match self {
            SurfaceMaterial::Acrylic => (0.88, 0.08),
            SurfaceMaterial::Wood => (0.92, 0.06),
            SurfaceMaterial::Concrete => (0.80, 0.12),
        }
    }
}

/// Table geometry and surface response.
///
/// All lengths are metres. `net_height` is measured from the playing
/// surface, so the top of the net sits at `height + net_height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Extent along x
    pub width: f32,
    /// Extent along z
    pub length: f32,
    /// Height of the playing surface above the floor
    pub height: f32,
    /// Net height above the playing surface
    pub net_height: f32,
    /// Surface material
    pub surface: SurfaceMaterial,
    /// Fraction of the net-perpendicular velocity kept after a net touch
    pub net_elasticity: f32,
    /// Fraction of planar velocity lost per table bounce
    pub friction: f32,
    /// Fraction of vertical velocity kept per table bounce
    pub bounce_restitution: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::for_surface(SurfaceMaterial::Acrylic)
    }
}

impl TableConfig {
    /// Regulation-sized table with the bounce preset of `surface`.
    pub fn for_surface(surface: SurfaceMaterial) -> Self {
        let (bounce_restitution, friction) = surface.bounce_preset();
        Self {
            width: 1.525,
            length: 2.74,
            height: 0.76,
            net_height: 0.1525,
            surface,
            net_elasticity: 0.3,
            friction,
            bounce_restitution,
        }
    }

    /// Half of the table width.
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    /// Half of the table length.
    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length * 0.5
    }

    /// Absolute height of the top of the net.
    #[inline]
    pub fn net_top(&self) -> f32 {
        self.height + self.net_height
    }

    /// Whether the ball's ground projection lies over the table.
    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        position.x.abs() <= self.half_width() && position.z.abs() <= self.half_length()
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("length", self.length),
            ("height", self.height),
            ("net_height", self.net_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }
        check_range("bounce_restitution", self.bounce_restitution, f32::EPSILON, 1.0)?;
        check_range("friction", self.friction, 0.0, 1.0)?;
        check_range("net_elasticity", self.net_elasticity, 0.0, 1.0)?;
        Ok(())
    }
}

// =============================================================================
// MATCH SETTINGS
// =============================================================================

/// AI difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiDifficulty {
    /// Relaxed opponent, tires quickly
    Casual,
    /// Club-level opponent
    #[default]
    Pro,
    /// Aggressive, well-conditioned opponent
    Master,
}

impl AiDifficulty {
    /// Baseline risk appetite for shot selection.
    pub fn aggression(self) -> f32 {
        match self {
            AiDifficulty::Casual => 0.3,
            AiDifficulty::Pro => 0.55,
            AiDifficulty::Master => 0.8,
        }
    }

    /// Starting stamina for both players. Focus starts 0.1 lower.
    pub fn base_stamina(self) -> f32 {
        match self {
            AiDifficulty::Casual => 0.6,
            AiDifficulty::Pro => 0.8,
            AiDifficulty::Master => 0.9,
        }
    }
}

impl FromStr for AiDifficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(AiDifficulty::Casual),
            "pro" => Ok(AiDifficulty::Pro),
            "master" => Ok(AiDifficulty::Master),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for AiDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AiDifficulty::Casual => "casual",
            AiDifficulty::Pro => "pro",
            AiDifficulty::Master => "master",
        };
        f.write_str(name)
    }
}

/// Match rules and ambient conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Points needed to take a game (with a two point lead)
    pub points_to_win: u32,
    /// Games needed to take the match
    pub games_to_win: u32,
    /// Serve changes hands after this many points
    pub serve_alternate_every: u32,
    /// Timeouts granted to each side
    pub max_timeouts: u32,
    /// Seconds without a racket contact before the rally is stopped
    pub rally_timeout_seconds: f32,
    /// AI tier
    pub ai_difficulty: AiDifficulty,
    /// Drag multiplier
    pub wind_resistance: f32,
    /// Air turbulence in `[0, 1]`
    pub humidity: f32,

    /// Seed for every random draw in the match
    pub rng_seed: u64,
    /// Bounce count at which the crowd reacts to a long rally
    pub long_rally_threshold: u32,
    /// Length of a timeout break
    pub timeout_break_seconds: f32,
    /// Longest physics step taken inside one tick
    pub max_substep_seconds: f32,
    /// Side fed by the input queue; `None` plays AI against AI
    pub human_side: Option<Side>,
    /// Where the ball rests after a point ends
    pub neutral_ball_position: Vec3,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            points_to_win: 11,
            games_to_win: 3,
            serve_alternate_every: 2,
            max_timeouts: 2,
            rally_timeout_seconds: 8.0,
            ai_difficulty: AiDifficulty::Pro,
            wind_resistance: 1.0,
            humidity: 0.3,
            rng_seed: 0x5EED,
            long_rally_threshold: 12,
            timeout_break_seconds: 3.0,
            max_substep_seconds: 1.0 / 60.0,
            human_side: Some(Side::A),
            neutral_ball_position: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl MatchSettings {
    /// Load settings from environment or use defaults.
    ///
    /// Recognised variables: `RALLY_POINTS_TO_WIN`, `RALLY_GAMES_TO_WIN`,
    /// `RALLY_AI_DIFFICULTY`, `RALLY_SEED`. Invalid values are logged and
    /// ignored.
    pub fn load_or_default() -> Self {
        let mut settings = Self::default();

        if let Ok(points) = std::env::var("RALLY_POINTS_TO_WIN") {
            match points.parse::<u32>() {
                Ok(parsed) if parsed > 0 => settings.points_to_win = parsed,
                _ => tracing::warn!("Invalid RALLY_POINTS_TO_WIN '{}', using default", points),
            }
        }

        if let Ok(games) = std::env::var("RALLY_GAMES_TO_WIN") {
            match games.parse::<u32>() {
                Ok(parsed) if parsed > 0 => settings.games_to_win = parsed,
                _ => tracing::warn!("Invalid RALLY_GAMES_TO_WIN '{}', using default", games),
            }
        }

        if let Ok(difficulty) = std::env::var("RALLY_AI_DIFFICULTY") {
            match difficulty.parse::<AiDifficulty>() {
                Ok(parsed) => settings.ai_difficulty = parsed,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        if let Ok(seed) = std::env::var("RALLY_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => settings.rng_seed = parsed,
                Err(_) => tracing::warn!("Invalid RALLY_SEED '{}', using default", seed),
            }
        }

        settings
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.points_to_win == 0 {
            return Err(ConfigError::ZeroCount { field: "points_to_win" });
        }
        if self.games_to_win == 0 {
            return Err(ConfigError::ZeroCount { field: "games_to_win" });
        }
        if self.serve_alternate_every == 0 {
            return Err(ConfigError::ZeroCount { field: "serve_alternate_every" });
        }
        if self.long_rally_threshold == 0 {
            return Err(ConfigError::ZeroCount { field: "long_rally_threshold" });
        }
        check_range("rally_timeout_seconds", self.rally_timeout_seconds, f32::EPSILON, f32::MAX)?;
        check_range("timeout_break_seconds", self.timeout_break_seconds, 0.0, f32::MAX)?;
        check_range("max_substep_seconds", self.max_substep_seconds, f32::EPSILON, 1.0)?;
        check_range("wind_resistance", self.wind_resistance, 0.0, f32::MAX)?;
        check_range("humidity", self.humidity, 0.0, 1.0)?;
        if !self.neutral_ball_position.is_finite() {
            return Err(ConfigError::NonFiniteNeutralPosition);
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}
