//! Crowd mood: event-driven jumps and a slow drift back to baseline.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::math::{approach, clamp01};

/// Per-second drift toward the baseline.
const DECAY_RATE: f32 = 0.02;

/// Mood of the crowd, each component in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrowdMood {
    /// How loud and animated the crowd is
    pub excitement: f32,
    /// Tension felt by the players
    pub pressure: f32,
    /// Quiet in the hall
    pub silence: f32,
}

impl CrowdMood {
    /// Neutral mood the crowd settles back to.
    pub const BASELINE: CrowdMood = CrowdMood {
        excitement: 0.3,
        pressure: 0.2,
        silence: 0.5,
    };

    /// Hash the mood.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_f32(self.excitement);
        hasher.update_f32(self.pressure);
        hasher.update_f32(self.silence);
    }
}

impl Default for CrowdMood {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Discrete moments the crowd reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrowdEvent {
    /// Serve winner nobody touched
    Ace,
    /// Rally reached the long-rally threshold
    LongRally,
    /// Ball clipped the table edge
    Edge,
    /// Ball touched the net and stayed in play
    LuckyNet,
    /// Play stopped
    Timeout,
}

/// Crowd state tracker.
#[derive(Clone, Debug, Default)]
pub struct CrowdSystem {
    mood: CrowdMood,
}

impl CrowdSystem {
    /// Crowd at baseline mood.
    pub fn new() -> Self {
        Self::default()
    }

    /// React to an event.
    pub fn on_event(&mut self, event: CrowdEvent) {
        let mood = &mut self.mood;
        match event {
            CrowdEvent::Ace => {
                mood.excitement += 0.2;
                mood.pressure += 0.1;
                mood.silence = 0.1;
            }
            CrowdEvent::LongRally => {
                mood.excitement += 0.15;
                mood.pressure += 0.05;
                mood.silence -= 0.1;
            }
            CrowdEvent::Edge | CrowdEvent::LuckyNet => {
                mood.pressure += 0.2;
                mood.excitement += 0.05;
            }
            CrowdEvent::Timeout => {
                mood.silence += 0.2;
            }
        }
        mood.excitement = clamp01(mood.excitement);
        mood.pressure = clamp01(mood.pressure);
        mood.silence = clamp01(mood.silence);
    }

    /// Drift toward the baseline over `dt` seconds.
    pub fn decay(&mut self, dt: f32) {
        let step = DECAY_RATE * dt.max(0.0);
        let base = CrowdMood::BASELINE;
        let mood = &mut self.mood;
        mood.excitement = approach(mood.excitement, base.excitement, step);
        mood.pressure = approach(mood.pressure, base.pressure, step * 0.5);
        mood.silence = approach(mood.silence, base.silence, step * 0.2);
    }

    /// Current mood by value.
    pub fn snapshot(&self) -> CrowdMood {
        self.mood
    }

    /// Current mood by reference.
    pub fn mood(&self) -> &CrowdMood {
        &self.mood
    }
}
