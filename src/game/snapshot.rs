//! Read-only view of a match, produced for rendering and UI.

use serde::{Serialize, Deserialize};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::game::crowd::CrowdMood;
use crate::game::score::ScoreSnapshot;
use crate::game::state::{BallState, PerSide, PlayerState, RallyPhase, Side};

/// Everything a presentation layer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RallySnapshot {
    /// Phase of play
    pub phase: RallyPhase,
    /// The ball
    pub ball: BallState,
    /// Both players
    pub players: PerSide<PlayerState>,
    /// Side serving next
    pub serving: Side,
    /// Bounces in the current rally
    pub rally_count: u32,
    /// Points in the current game
    pub game_score: PerSide<u32>,
    /// Games won
    pub match_score: PerSide<u32>,
    /// Timeouts left
    pub timeouts_remaining: PerSide<u32>,
    /// Crowd mood
    pub crowd: CrowdMood,
    /// Simulated seconds since match start
    pub clock: f32,
}

impl RallySnapshot {
    /// Scoreboard part of the snapshot.
    pub fn score(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            game: self.game_score,
            games: self.match_score,
            serving: self.serving,
            timeouts_remaining: self.timeouts_remaining,
        }
    }

    /// SHA-256 over every field.
    ///
    /// Two snapshots hash equal exactly when their state is bit-identical.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.clock, |hasher| {
            hasher.update_u8(self.phase as u8);
            self.ball.hash_into(hasher);
            for side in Side::BOTH {
                self.players[side].hash_into(hasher);
            }
            hasher.update_u32(self.rally_count);
            self.score().hash_into(hasher);
            self.crowd.hash_into(hasher);
        })
    }
}
