//! Input Intents
//!
//! Tagged intents produced by the (external) input layer and the queue the
//! controller drains them from. Numeric fields are never rejected here;
//! the consuming system clamps them.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::core::vec3::Vec3;
use crate::game::shot::{ShotIntent, ShotStyle};
use crate::game::spin::SpinType;

// =============================================================================
// INTENTS
// =============================================================================

/// One player request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputIntent {
    /// Swing the racket
    Swing {
        /// Aim of the stroke: `x` is the lateral target, `|z|` the depth
        /// past the net (both in metres)
        direction: Vec3,
        /// Swing effort, mapped onto shot power
        intensity: f32,
        /// Spin to impart
        spin: SpinType,
        /// Stroke family
        style: ShotStyle,
    },

    /// Throw the ball up to serve
    ServeToss {
        /// Horizontal nudge direction
        direction: Vec3,
        /// Toss strength, clamped to `[0.5, 2]`
        strength: f32,
    },

    /// Shift the racket sideways
    Move {
        /// Lateral displacement; only `x` is used
        delta: Vec3,
    },

    /// Ask for a timeout
    Timeout,
}

/// Discriminant of [`InputIntent`], used to consume by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// [`InputIntent::Swing`]
    Swing,
    /// [`InputIntent::ServeToss`]
    ServeToss,
    /// [`InputIntent::Move`]
    Move,
    /// [`InputIntent::Timeout`]
    Timeout,
}

impl InputIntent {
    /// Kind of this intent.
    #[inline]
    pub fn kind(&self) -> InputKind {
        match self {
            InputIntent::Swing { .. } => InputKind::Swing,
            InputIntent::ServeToss { .. } => InputKind::ServeToss,
            InputIntent::Move { .. } => InputKind::Move,
            InputIntent::Timeout => InputKind::Timeout,
        }
    }

    /// Turn a swing into the shot the racket executes.
    ///
    /// Intensity maps straight onto power and is clamped into the accepted
    /// power range. Returns `None` for any other intent.
    pub fn to_shot(&self) -> Option<ShotIntent> {
        match *self {
            InputIntent::Swing { direction, intensity, spin, style } => Some(
                ShotIntent::new(style, spin)
                    .with_power(intensity)
                    .with_aim(direction),
            ),
            _ => None,
        }
    }
}

// =============================================================================
// QUEUE
// =============================================================================

/// FIFO of pending intents.
///
/// Bounded: when full, the oldest intent is dropped to make room.
#[derive(Clone, Debug)]
pub struct InputQueue {
    pending: VecDeque<InputIntent>,
    capacity: usize,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl InputQueue {
    /// Default bound on pending intents.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Queue with the default bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue holding at most `capacity` intents (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an intent.
    pub fn push(&mut self, intent: InputIntent) {
        if self.pending.len() >= self.capacity {
            if let Some(dropped) = self.pending.pop_front() {
                warn!("Input queue full, dropping {:?}", dropped.kind());
            }
        }
        self.pending.push_back(intent);
    }

    /// Remove and return the oldest intent of `kind`, leaving the others.
    pub fn consume(&mut self, kind: InputKind) -> Option<InputIntent> {
        let index = self.pending.iter().position(|intent| intent.kind() == kind)?;
        self.pending.remove(index)
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pending intents.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Nothing pending?
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
