//! Game Logic Module
//!
//! All match simulation code. Deterministic for a given seed and input
//! sequence.
//!
//! ## Module Structure
//!
//! - `state`: Ball, players, sides and rally phase
//! - `spin` / `shot`: Spin categories and stroke intents
//! - `physics` / `bounce` / `prediction`: Ball dynamics, contacts, look-ahead
//! - `serve`: Toss and serve strike
//! - `collision`: Racket reach and strike response
//! - `ai`: Opponent decision making
//! - `fatigue` / `crowd`: Side models fed back into play
//! - `rally`: Per-tick rally orchestration and point rules
//! - `score`: Points, games, serve rotation, timeouts
//! - `input`: Intent queue
//! - `events`: Telemetry
//! - `snapshot`: Read-only match view
//! - `tick`: Match controller

pub mod state;
pub mod spin;
pub mod shot;
pub mod physics;
pub mod bounce;
pub mod prediction;
pub mod serve;
pub mod collision;
pub mod ai;
pub mod fatigue;
pub mod crowd;
pub mod rally;
pub mod score;
pub mod input;
pub mod events;
pub mod snapshot;
pub mod tick;

// Re-export key types
pub use state::{BallState, PlayerState, PerSide, Side, RallyPhase};
pub use shot::{ShotIntent, ShotStyle};
pub use spin::{SpinProfile, SpinType};
pub use input::{InputIntent, InputQueue};
pub use rally::{PointReason, RallyOutcome};
pub use events::{TelemetryData, TelemetryEvent};
pub use snapshot::RallySnapshot;
pub use tick::MatchController;
