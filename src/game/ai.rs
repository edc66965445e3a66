//! AI Opponent
//!
//! A small state machine that turns a trajectory prediction into a shot.
//! The mode (passive / control / attack) is re-evaluated on a fixed cadence
//! of simulated time; shot selection runs on every call.
//!
//! Every threshold lives in [`AiPolicy`], so alternative personalities can
//! be plugged in without touching the selection logic.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::AiDifficulty;
use crate::core::math::clamp;
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vec3;
use crate::game::prediction::LandingPrediction;
use crate::game::shot::{ShotIntent, ShotStyle};
use crate::game::spin::SpinType;
use crate::game::state::{BallState, PlayerState, Side};

/// Overall playing attitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiMode {
    /// Conserve energy, keep the ball in play
    Passive,
    /// Build the point
    #[default]
    Control,
    /// Go for winners
    Attack,
}

// =============================================================================
// POLICY
// =============================================================================

/// Tunable thresholds of the AI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiPolicy {
    /// Seconds between mode re-evaluations
    pub decision_interval: f32,
    /// Baseline risk appetite
    pub aggression: f32,
    /// Weight of missing stamina in the risk estimate
    pub stamina_risk_weight: f32,
    /// Weight of missing focus in the risk estimate
    pub focus_risk_weight: f32,
    /// Lowest risk
    pub min_risk: f32,
    /// Highest risk
    pub max_risk: f32,
    /// Risk above which a net-bound ball is lobbed (and chops are chosen)
    pub lob_risk: f32,
    /// Rallies shorter than this are always driven
    pub opening_rally: u32,
    /// Risk above which the AI smashes
    pub smash_risk: f32,
    /// Risk above which smashes carry topspin
    pub smash_topspin_risk: f32,
    /// Stamina below which the AI turns passive
    pub passive_stamina: f32,
    /// Rally length beyond which the AI attacks
    pub attack_rally: u32,
    /// Focus above which the AI attacks
    pub attack_focus: f32,
    /// Lateral aim jitter at zero focus (m)
    pub aim_jitter: f32,
    /// Nearest aim depth past the net (m)
    pub aim_depth_min: f32,
    /// Deepest aim depth past the net (m)
    pub aim_depth_max: f32,
}

impl AiPolicy {
    /// Policy for a difficulty tier.
    pub fn for_difficulty(difficulty: AiDifficulty) -> Self {
        Self {
            aggression: difficulty.aggression(),
            ..Self::default()
        }
    }
}

impl Default for AiPolicy {
    fn default() -> Self {
        Self {
            decision_interval: 1.2,
            aggression: AiDifficulty::Pro.aggression(),
            stamina_risk_weight: 0.4,
            focus_risk_weight: 0.3,
            min_risk: 0.1,
            max_risk: 0.95,
            lob_risk: 0.5,
            opening_rally: 3,
            smash_risk: 0.75,
            smash_topspin_risk: 0.8,
            passive_stamina: 0.25,
            attack_rally: 14,
            attack_focus: 0.6,
            aim_jitter: 0.2,
            aim_depth_min: 0.55,
            aim_depth_max: 0.95,
        }
    }
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Per-player AI brain.
#[derive(Clone, Debug)]
pub struct AiStateMachine {
    policy: AiPolicy,
    mode: AiMode,
    last_decision: Option<f32>,
}

impl AiStateMachine {
    /// Brain tuned for a difficulty tier.
    pub fn new(difficulty: AiDifficulty) -> Self {
        Self::with_policy(AiPolicy::for_difficulty(difficulty))
    }

    /// Brain with a custom policy.
    pub fn with_policy(policy: AiPolicy) -> Self {
        Self {
            policy,
            mode: AiMode::Control,
            last_decision: None,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> AiMode {
        self.mode
    }

    /// Active policy.
    pub fn policy(&self) -> &AiPolicy {
        &self.policy
    }

    /// Risk appetite for a player in its current condition.
    pub fn risk(&self, player: &PlayerState) -> f32 {
        let p = &self.policy;
        clamp(
            p.aggression
                + p.stamina_risk_weight * (1.0 - player.stamina)
                + p.focus_risk_weight * (1.0 - player.focus),
            p.min_risk,
            p.max_risk,
        )
    }

    /// Choose the next shot.
    ///
    /// `now` is simulated match time; the mode is refreshed when no decision
    /// has been made yet or the decision interval has elapsed.
    pub fn decide_intent(
        &mut self,
        _ball: &BallState,
        player: &PlayerState,
        prediction: &LandingPrediction,
        rally_count: u32,
        now: f32,
        rng: &mut DeterministicRng,
    ) -> ShotIntent {
        let due = match self.last_decision {
            None => true,
            Some(last) => now - last > self.policy.decision_interval,
        };
        if due {
            let mode = self.evaluate_mode(player, prediction, rally_count);
            if mode != self.mode {
                debug!("AI {} switches {:?} -> {:?}", player.id, self.mode, mode);
            }
            self.mode = mode;
            self.last_decision = Some(now);
        }

        let p = &self.policy;
        let risk = self.risk(player);
        let style = self.select_style(risk, prediction, rally_count);
        let spin = self.select_spin(style, risk);

        let jitter = rng.range_f32(-p.aim_jitter, p.aim_jitter) * (1.0 - player.focus);
        let depth = rng.range_f32(p.aim_depth_min, p.aim_depth_max);
        let aim = Vec3::new(
            prediction.landing_position.x + jitter,
            0.1 + 0.1 * risk,
            depth * target_sign(player.id),
        );

        ShotIntent {
            style,
            spin,
            aim,
            power: clamp(0.6 + 0.7 * risk, ShotIntent::MIN_POWER, ShotIntent::MAX_POWER),
            safe_margin: clamp(0.15 - 0.05 * risk, 0.05, 0.2),
        }
    }

    fn select_style(&self, risk: f32, prediction: &LandingPrediction, rally_count: u32) -> ShotStyle {
        let p = &self.policy;
        if prediction.will_hit_net && risk > p.lob_risk {
            ShotStyle::Lob
        } else if rally_count < p.opening_rally {
            ShotStyle::Drive
        } else if risk > p.smash_risk {
            ShotStyle::Smash
        } else if risk > p.lob_risk {
            ShotStyle::Chop
        } else {
            ShotStyle::Block
        }
    }

    fn select_spin(&self, style: ShotStyle, risk: f32) -> SpinType {
        let p = &self.policy;
        match style {
            ShotStyle::Smash if risk > p.smash_topspin_risk => SpinType::Top,
            ShotStyle::Smash => SpinType::None,
            ShotStyle::Chop => SpinType::Back,
            ShotStyle::Drive if risk > p.lob_risk => SpinType::Top,
            ShotStyle::Drive => SpinType::None,
            ShotStyle::Lob => SpinType::Cork,
            _ => SpinType::SideLeft,
        }
    }

    fn evaluate_mode(&self, player: &PlayerState, prediction: &LandingPrediction, rally_count: u32) -> AiMode {
        let p = &self.policy;
        if player.stamina < p.passive_stamina {
            AiMode::Passive
        } else if rally_count > p.attack_rally && !prediction.will_hit_net {
            AiMode::Attack
        } else if player.focus > p.attack_focus {
            AiMode::Attack
        } else {
            AiMode::Control
        }
    }
}

/// Sign of z on the half the player aims at.
fn target_sign(side: Side) -> f32 {
    side.opponent().sign()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchSettings;

    fn player(stamina: f32, focus: f32) -> PlayerState {
        let mut p = PlayerState::new(Side::B, "Bot", &MatchSettings::default());
        p.stamina = stamina;
        p.focus = focus;
        p
    }

    fn prediction(will_hit_net: bool) -> LandingPrediction {
        LandingPrediction {
            landing_position: Vec3::new(0.3, 0.76, 0.8),
            time_to_bounce: 0.3,
            will_hit_net,
            will_land_out: false,
        }
    }

    fn decide(ai: &mut AiStateMachine, p: &PlayerState, pred: &LandingPrediction, rally: u32) -> ShotIntent {
        let ball = BallState::at_rest(Vec3::ZERO);
        ai.decide_intent(&ball, p, pred, rally, 0.0, &mut DeterministicRng::new(3))
    }

    #[test]
    fn test_risk_formula() {
        let ai = AiStateMachine::new(AiDifficulty::Casual);
        // 0.3 + 0.4 * 0.5 + 0.3 * 0.5 = 0.65
        assert!((ai.risk(&player(0.5, 0.5)) - 0.65).abs() < 1e-5);
        assert_eq!(ai.risk(&player(1.0, 1.0)), 0.3);

        let master = AiStateMachine::new(AiDifficulty::Master);
        assert_eq!(master.risk(&player(0.0, 0.0)), 0.95);
    }

    #[test]
    fn test_opening_rally_drives() {
        let mut ai = AiStateMachine::new(AiDifficulty::Pro);
        let intent = decide(&mut ai, &player(0.8, 0.7), &prediction(false), 0);
        assert_eq!(intent.style, ShotStyle::Drive);
        // risk = 0.55 + 0.08 + 0.09 = 0.72
        assert_eq!(intent.spin, SpinType::Top);
        assert!((intent.power - (0.6 + 0.7 * 0.72)).abs() < 1e-4);
    }

    #[test]
    fn test_style_ladder() {
        let mut ai = AiStateMachine::new(AiDifficulty::Pro);

        let tired = player(0.2, 0.2);
        let intent = decide(&mut ai, &tired, &prediction(true), 5);
        assert_eq!(intent.style, ShotStyle::Lob);
        assert_eq!(intent.spin, SpinType::Cork);

        let intent = decide(&mut ai, &tired, &prediction(false), 5);
        assert_eq!(intent.style, ShotStyle::Smash);
        assert_eq!(intent.spin, SpinType::Top);

        let fresh = player(1.0, 1.0);
        let intent = decide(&mut ai, &fresh, &prediction(false), 5);
        assert_eq!(intent.style, ShotStyle::Chop);
        assert_eq!(intent.spin, SpinType::Back);

        let mut calm = AiStateMachine::new(AiDifficulty::Casual);
        let intent = decide(&mut calm, &fresh, &prediction(false), 5);
        assert_eq!(intent.style, ShotStyle::Block);
        assert_eq!(intent.spin, SpinType::SideLeft);
    }

    #[test]
    fn test_aim_targets_opponent_half() {
        let mut ai = AiStateMachine::new(AiDifficulty::Pro);
        let mut rng = DeterministicRng::new(11);
        let ball = BallState::at_rest(Vec3::ZERO);
        let p = player(0.8, 0.7);
        for i in 0..50 {
            let intent = ai.decide_intent(&ball, &p, &prediction(false), 4, i as f32, &mut rng);
            // Side B aims into A's half
            assert!(intent.aim.z <= -0.55 && intent.aim.z >= -0.95);
            assert!((intent.aim.x - 0.3).abs() <= 0.2 * 0.3 + 1e-5);
            assert!(intent.safe_margin >= 0.05 && intent.safe_margin <= 0.2);
        }
    }

    #[test]
    fn test_mode_cadence() {
        let mut ai = AiStateMachine::new(AiDifficulty::Pro);
        let ball = BallState::at_rest(Vec3::ZERO);
        let mut rng = DeterministicRng::new(5);
        assert_eq!(ai.mode(), AiMode::Control);

        ai.decide_intent(&ball, &player(0.1, 0.1), &prediction(false), 0, 0.0, &mut rng);
        assert_eq!(ai.mode(), AiMode::Passive);

        // Too soon: mode sticks
        ai.decide_intent(&ball, &player(0.9, 0.9), &prediction(false), 0, 1.0, &mut rng);
        assert_eq!(ai.mode(), AiMode::Passive);

        ai.decide_intent(&ball, &player(0.9, 0.9), &prediction(false), 0, 1.3, &mut rng);
        assert_eq!(ai.mode(), AiMode::Attack);

        ai.decide_intent(&ball, &player(0.9, 0.5), &prediction(false), 20, 3.0, &mut rng);
        assert_eq!(ai.mode(), AiMode::Attack);

        ai.decide_intent(&ball, &player(0.9, 0.5), &prediction(true), 20, 4.5, &mut rng);
        assert_eq!(ai.mode(), AiMode::Control);
    }

    #[test]
    fn test_custom_policy() {
        let policy = AiPolicy {
            opening_rally: 0,
            smash_risk: 0.0,
            ..AiPolicy::default()
        };
        let mut ai = AiStateMachine::with_policy(policy);
        let intent = decide(&mut ai, &player(1.0, 1.0), &prediction(false), 0);
        assert_eq!(intent.style, ShotStyle::Smash);
    }
}
