//! Scoring
//!
//! Point, game and match tallies, serve rotation and timeouts. Knows nothing
//! about physics: it only hears "side X won a point".

use serde::{Serialize, Deserialize};

use crate::config::MatchSettings;
use crate::core::hash::StateHasher;
use crate::game::state::{PerSide, Side};

/// What a point award changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointAward {
    /// The point closed out a game
    pub game_won: bool,
    /// The point closed out the match
    pub match_won: bool,
}

/// Read-only view of the scoreboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Points in the current game
    pub game: PerSide<u32>,
    /// Games won
    pub games: PerSide<u32>,
    /// Side serving next
    pub serving: Side,
    /// Timeouts left
    pub timeouts_remaining: PerSide<u32>,
}

impl ScoreSnapshot {
    /// Hash the scoreboard.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        for side in Side::BOTH {
            hasher.update_u32(self.game[side]);
            hasher.update_u32(self.games[side]);
            hasher.update_u32(self.timeouts_remaining[side]);
        }
        hasher.update_u8(self.serving as u8);
    }
}

/// Scoreboard state machine.
#[derive(Clone, Debug)]
pub struct ScoreSystem {
    points_to_win: u32,
    games_to_win: u32,
    alternate_every: u32,
    game: PerSide<u32>,
    games: PerSide<u32>,
    serving: Side,
    points_since_switch: u32,
    timeouts: PerSide<u32>,
}

impl ScoreSystem {
    /// Fresh scoreboard; side A serves first.
    pub fn new(settings: &MatchSettings) -> Self {
        Self {
            points_to_win: settings.points_to_win,
            games_to_win: settings.games_to_win,
            alternate_every: settings.serve_alternate_every.max(1),
            game: PerSide::default(),
            games: PerSide::default(),
            serving: Side::A,
            points_since_switch: 0,
            timeouts: PerSide::new(settings.max_timeouts, settings.max_timeouts),
        }
    }

    /// Credit a point to `winner`.
    ///
    /// A game needs `points_to_win` with a two point lead. The game tally
    /// resets when a game is won; the serve rotation carries on.
    pub fn award_point(&mut self, winner: Side) -> PointAward {
        let mut award = PointAward::default();

        self.game[winner] += 1;

        self.points_since_switch += 1;
        if self.points_since_switch >= self.alternate_every {
            self.points_since_switch = 0;
            self.serving = self.serving.opponent();
        }

        let own = self.game[winner];
        let other = self.game[winner.opponent()];
        if own >= self.points_to_win && own >= other + 2 {
            self.games[winner] += 1;
            self.game = PerSide::default();
            award.game_won = true;
            award.match_won = self.games[winner] >= self.games_to_win;
        }

        award
    }

    /// Spend one of `side`'s timeouts. Fails when none are left.
    pub fn call_timeout(&mut self, side: Side) -> bool {
        let remaining = &mut self.timeouts[side];
        if *remaining == 0 {
            return false;
        }
        *remaining -= 1;
        true
    }

    /// Side serving the next point.
    pub fn serving(&self) -> Side {
        self.serving
    }

    /// Match winner, once there is one.
    pub fn match_winner(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.games[*side] >= self.games_to_win)
    }

    /// Current scoreboard by value.
    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            game: self.game,
            games: self.games,
            serving: self.serving,
            timeouts_remaining: self.timeouts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoreboard() -> ScoreSystem {
        ScoreSystem::new(&MatchSettings::default())
    }

    #[test]
    fn test_deuce() {
        let mut score = scoreboard();
        for _ in 0..10 {
            score.award_point(Side::A);
            score.award_point(Side::B);
        }
        assert_eq!(score.snapshot().game, PerSide::new(10, 10));

        let first = score.award_point(Side::A);
        assert!(!first.game_won);
        assert_eq!(score.snapshot().game, PerSide::new(11, 10));

        let second = score.award_point(Side::A);
        assert!(second.game_won);
        assert!(!second.match_won);
        assert_eq!(score.snapshot().game, PerSide::new(0, 0));
        assert_eq!(score.snapshot().games, PerSide::new(1, 0));
    }

    #[test]
    fn test_straight_game() {
        let mut score = scoreboard();
        for i in 0..11 {
            let award = score.award_point(Side::B);
            assert_eq!(award.game_won, i == 10);
        }
        assert_eq!(score.snapshot().games[Side::B], 1);
    }

    #[test]
    fn test_serve_alternates_every_two_points() {
        let mut score = scoreboard();
        assert_eq!(score.serving(), Side::A);
        score.award_point(Side::A);
        assert_eq!(score.serving(), Side::A);
        score.award_point(Side::B);
        assert_eq!(score.serving(), Side::B);
        score.award_point(Side::B);
        score.award_point(Side::B);
        assert_eq!(score.serving(), Side::A);
    }

    #[test]
    fn test_match_won() {
        let settings = MatchSettings {
            points_to_win: 1,
            games_to_win: 2,
            ..MatchSettings::default()
        };
        let mut score = ScoreSystem::new(&settings);

        // First to 1 still needs a two point lead
        assert!(!score.award_point(Side::A).game_won);
        assert!(score.award_point(Side::A).game_won);
        assert_eq!(score.match_winner(), None);

        score.award_point(Side::A);
        let award = score.award_point(Side::A);
        assert!(award.match_won);
        assert_eq!(score.match_winner(), Some(Side::A));
    }

    #[test]
    fn test_timeouts() {
        let mut score = scoreboard();
        assert!(score.call_timeout(Side::A));
        assert!(score.call_timeout(Side::A));
        assert!(!score.call_timeout(Side::A));
        assert_eq!(score.snapshot().timeouts_remaining, PerSide::new(0, 2));
    }
}
