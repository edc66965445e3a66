//! Match Telemetry
//!
//! Append-only log of notable match events, stamped with simulated time
//! and drained by the host with [`TelemetryRecorder::flush`].

use serde::{Serialize, Deserialize};

use crate::game::rally::PointReason;
use crate::game::shot::ShotStyle;
use crate::game::state::Side;

/// Telemetry payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TelemetryData {
    /// Server threw the ball up
    ServeTossed {
        /// Serving side
        server: Side,
    },

    /// A racket struck the ball
    Strike {
        /// Striking side
        player: Side,
        /// Stroke played
        style: ShotStyle,
        /// Requested power
        power: f32,
    },

    /// Ball touched the net
    NetContact,

    /// Ball bounced within a couple of centimetres of the table edge
    EdgeBall {
        /// Half the ball clipped
        side: Side,
    },

    /// Rally reached the long-rally threshold
    LongRally {
        /// Bounces so far
        length: u32,
    },

    /// Play stopped; `player` is `None` when the rally stalled on its own
    Timeout {
        /// Side that called it
        player: Option<Side>,
    },

    /// A point was decided
    PointOver {
        /// Side credited with the point
        winner: Side,
        /// Rule that ended the point
        reason: PointReason,
    },

    /// A game was decided
    GameWon {
        /// Side that took the game
        winner: Side,
    },

    /// The match was decided
    MatchWon {
        /// Side that took the match
        winner: Side,
    },
}

impl TelemetryData {
    /// Player the event is about, if any.
    pub fn player(&self) -> Option<Side> {
        match self {
            TelemetryData::ServeTossed { server } => Some(*server),
            TelemetryData::Strike { player, .. } => Some(*player),
            TelemetryData::EdgeBall { side } => Some(*side),
            TelemetryData::Timeout { player } => *player,
            TelemetryData::PointOver { winner, .. }
            | TelemetryData::GameWon { winner }
            | TelemetryData::MatchWon { winner } => Some(*winner),
            TelemetryData::NetContact | TelemetryData::LongRally { .. } => None,
        }
    }
}

/// A telemetry record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Simulated seconds since match start
    pub timestamp: f32,

    /// Event data
    #[serde(flatten)]
    pub data: TelemetryData,
}

/// Append-only telemetry buffer.
#[derive(Clone, Debug, Default)]
pub struct TelemetryRecorder {
    events: Vec<TelemetryEvent>,
}

impl TelemetryRecorder {
    /// Empty recorder.
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(64),
        }
    }

    /// Append an event.
    pub fn track(&mut self, timestamp: f32, data: TelemetryData) {
        self.events.push(TelemetryEvent { timestamp, data });
    }

    /// Drain every buffered event, oldest first.
    pub fn flush(&mut self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buffered events without draining.
    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// No events buffered?
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_drains_in_order() {
        let mut recorder = TelemetryRecorder::new();
        recorder.track(0.5, TelemetryData::ServeTossed { server: Side::A });
        recorder.track(1.0, TelemetryData::NetContact);
        assert_eq!(recorder.len(), 2);

        let drained = recorder.flush();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].timestamp, 0.5);
        assert_eq!(drained[1].data, TelemetryData::NetContact);
        assert!(recorder.is_empty());
        assert!(recorder.flush().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let event = TelemetryEvent {
            timestamp: 2.0,
            data: TelemetryData::PointOver {
                winner: Side::B,
                reason: PointReason::Out,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "POINT_OVER");
        assert_eq!(json["winner"], "B");
        assert_eq!(json["reason"], "OUT");
        assert_eq!(json["timestamp"], 2.0);
    }

    #[test]
    fn test_event_player() {
        assert_eq!(TelemetryData::GameWon { winner: Side::A }.player(), Some(Side::A));
        assert_eq!(TelemetryData::Timeout { player: None }.player(), None);
        assert_eq!(TelemetryData::LongRally { length: 12 }.player(), None);
    }
}
