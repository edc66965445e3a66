//! Stamina and focus drain during rallies, recovery between them.

use crate::core::math::clamp01;
use crate::game::crowd::CrowdMood;
use crate::game::state::PlayerState;

/// Focus lost per unit of stamina lost.
const FOCUS_DRAIN_RATIO: f32 = 0.8;
/// Focus regained per unit of stamina regained.
const FOCUS_RECOVERY_RATIO: f32 = 0.5;

/// Fatigue model.
#[derive(Clone, Copy, Debug, Default)]
pub struct FatigueModel;

impl FatigueModel {
    /// Drain a player after a bounce; longer rallies and a tense crowd
    /// cost more.
    pub fn apply_fatigue(&self, player: &mut PlayerState, rally_length: u32, mood: &CrowdMood) {
        let fatigue = rally_length as f32 * player.fatigue_rate * (1.0 + 0.2 * mood.pressure);
        player.stamina = clamp01(player.stamina - fatigue);
        player.focus = clamp01(player.focus - FOCUS_DRAIN_RATIO * fatigue);
    }

    /// Recover over `dt` seconds of rest.
    pub fn recover(&self, player: &mut PlayerState, dt: f32) {
        let recovery = dt.max(0.0) * (0.1 + 0.1 * player.focus);
        player.stamina = clamp01(player.stamina + recovery);
        player.focus = clamp01(player.focus + FOCUS_RECOVERY_RATIO * recovery);
    }
}
