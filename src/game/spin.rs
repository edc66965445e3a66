//! Spin categories and their angular velocity.

use std::f32::consts::PI;
use serde::{Serialize, Deserialize};

use crate::core::vec3::Vec3;

/// Spin imparted by a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SpinType {
    /// Flat ball
    #[default]
    None = 0,
    /// Topspin
    Top = 1,
    /// Backspin
    Back = 2,
    /// Sidespin curling left
    SideLeft = 3,
    /// Sidespin curling right
    SideRight = 4,
    /// Corkscrew spin around the lateral axis
    Cork = 5,
}

/// A spin category paired with a magnitude in revolutions per minute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinProfile {
    /// Category
    pub spin: SpinType,
    /// Magnitude in rpm; negative values are treated as zero
    pub rpm: f32,
}

impl SpinProfile {
    /// Create a profile.
    pub fn new(spin: SpinType, rpm: f32) -> Self {
        Self { spin, rpm }
    }

    /// Angular velocity vector in rad/s.
    ///
    /// Each category spins about a fixed axis: top/back about z,
    /// side spins about y, cork about x.
    pub fn angular_velocity(&self) -> Vec3 {
        let rad = 2.0 * PI * self.rpm.max(0.0) / 60.0;
        match self.spin {
            SpinType::Top => Vec3::new(0.0, 0.0, rad),
            SpinType::Back => Vec3::new(0.0, 0.0, -rad),
            SpinType::SideLeft => Vec3::new(0.0, rad, 0.0),
            SpinType::SideRight => Vec3::new(0.0, -rad, 0.0),
            SpinType::Cork => Vec3::new(rad, 0.0, 0.0),
            SpinType::None => Vec3::ZERO,
        }
    }
}
