//! Trajectory Prediction
//!
//! Forward-simulates a copy of the ball to estimate where and when it will
//! next reach table height. Used by the AI to pick its shots.

use serde::{Serialize, Deserialize};

use crate::config::TableConfig;
use crate::core::vec3::Vec3;
use crate::game::bounce::in_net_slab;
use crate::game::physics::GRAVITY;
use crate::game::state::BallState;

/// Integration step (s).
pub const PREDICTION_STEP: f32 = 0.005;

/// Longest look-ahead (s).
pub const PREDICTION_HORIZON: f32 = 5.0;

/// Magnus coefficient of the simplified predictor.
const PREDICTION_MAGNUS: f32 = 0.0004;

/// Estimated next landing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandingPrediction {
    /// Where the ball crosses table height
    pub landing_position: Vec3,
    /// Seconds until that crossing
    pub time_to_bounce: f32,
    /// The path clips the net on the way
    pub will_hit_net: bool,
    /// The landing lies outside the table (or never happens)
    pub will_land_out: bool,
}

/// Stateless forward simulator.
#[derive(Clone, Copy, Debug, Default)]
pub struct PredictionEngine;

impl PredictionEngine {
    /// Predict the next landing of `ball` without touching it.
    pub fn predict_landing(&self, ball: &BallState, table: &TableConfig) -> LandingPrediction {
        let mut position = ball.position;
        let mut velocity = ball.velocity;
        let spin = ball.spin;

        let mut elapsed = 0.0f32;
        let mut will_hit_net = false;

        while elapsed < PREDICTION_HORIZON {
            let magnus = spin.cross(velocity) * PREDICTION_MAGNUS;
            velocity += GRAVITY * PREDICTION_STEP + magnus * PREDICTION_STEP;
            position += velocity * PREDICTION_STEP;
            elapsed += PREDICTION_STEP;

            if in_net_slab(position.x, position.y, position.z, table) {
                will_hit_net = true;
            }

            if position.y <= table.height {
                let will_land_out = position.x.abs() > table.half_width()
                    || position.z.abs() > table.half_length();
                return LandingPrediction {
                    landing_position: position,
                    time_to_bounce: elapsed,
                    will_hit_net,
                    will_land_out,
                };
            }
        }

        LandingPrediction {
            landing_position: position,
            time_to_bounce: elapsed,
            will_hit_net,
            will_land_out: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(position: Vec3, velocity: Vec3) -> BallState {
        let mut ball = BallState::at_rest(position);
        ball.velocity = velocity;
        ball.in_play = true;
        ball
    }

    #[test]
    fn test_predicts_landing_on_table() {
        let table = TableConfig::default();
        let live = ball(Vec3::new(0.0, 1.0, -0.6), Vec3::new(0.0, 1.0, 4.0));

        let prediction = PredictionEngine.predict_landing(&live, &table);

        assert!(!prediction.will_land_out);
        assert!(!prediction.will_hit_net);
        assert!(prediction.landing_position.z > 0.0);
        assert!(prediction.time_to_bounce > 0.2 && prediction.time_to_bounce < 0.5);
    }

    #[test]
    fn test_predicts_long_ball_out() {
        let table = TableConfig::default();
        let live = ball(Vec3::new(0.0, 1.0, -0.6), Vec3::new(0.0, 2.0, 12.0));
        assert!(PredictionEngine.predict_landing(&live, &table).will_land_out);
    }

    #[test]
    fn test_predicts_net() {
        let table = TableConfig::default();
        let live = ball(Vec3::new(0.0, 0.85, -0.5), Vec3::new(0.0, 0.0, 4.0));
        assert!(PredictionEngine.predict_landing(&live, &table).will_hit_net);
    }

    #[test]
    fn test_live_ball_untouched() {
        let table = TableConfig::default();
        let live = ball(Vec3::new(0.0, 1.0, -0.6), Vec3::new(0.0, 1.0, 4.0));
        let copy = live.clone();
        PredictionEngine.predict_landing(&live, &table);
        assert_eq!(live, copy);
    }

    #[test]
    fn test_ball_that_never_lands_is_out() {
        let table = TableConfig::default();
        let live = ball(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 40.0, 0.0));
        let prediction = PredictionEngine.predict_landing(&live, &table);
        assert!(prediction.will_land_out);
        assert!(prediction.time_to_bounce >= PREDICTION_HORIZON - PREDICTION_STEP);
    }
}
