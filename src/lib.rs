//! # Spin Rally
//!
//! Deterministic table-tennis match simulation: ball dynamics with drag and
//! Magnus spin, table and net contacts, an AI opponent, rally rules and
//! scoring, driven one frame at a time by a single controller.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         SPIN RALLY                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                  │
//! │  ├── vec3.rs      - 3D vector algebra                         │
//! │  ├── math.rs      - Scalar clamps and interpolation           │
//! │  ├── rng.rs       - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs      - Snapshot hashing                          │
//! │                                                               │
//! │  config.rs        - Table geometry and match settings         │
//! │                                                               │
//! │  game/            - Match simulation                          │
//! │  ├── physics.rs   - Gravity, drag, Magnus integration         │
//! │  ├── bounce.rs    - Table and net contacts                    │
//! │  ├── prediction.rs- Landing look-ahead                        │
//! │  ├── serve.rs     - Toss and serve strike                     │
//! │  ├── collision.rs - Racket reach and strike response          │
//! │  ├── ai.rs        - Opponent state machine                    │
//! │  ├── fatigue.rs   - Stamina and focus                         │
//! │  ├── crowd.rs     - Crowd mood                                │
//! │  ├── rally.rs     - Rally orchestration and point rules       │
//! │  ├── score.rs     - Points, games, serve rotation, timeouts   │
//! │  ├── input.rs     - Intent queue                              │
//! │  ├── events.rs    - Telemetry                                 │
//! │  ├── snapshot.rs  - Read-only match view                      │
//! │  └── tick.rs      - Match controller                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! - All randomness comes from seeded Xorshift128+ streams
//! - Time is the simulated match clock, never the wall clock
//! - Snapshots hash to identical SHA-256 digests for identical runs
//!
//! Given the same settings, seed and input sequence, a match replays
//! bit-for-bit on the same build.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod config;
pub mod game;

// Re-export commonly used types
pub use core::vec3::Vec3;
pub use core::rng::DeterministicRng;
pub use config::{AiDifficulty, ConfigError, MatchSettings, SurfaceMaterial, TableConfig};
pub use game::input::InputIntent;
pub use game::snapshot::RallySnapshot;
pub use game::state::{RallyPhase, Side};
pub use game::tick::MatchController;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate the controller is tuned for (Hz)
pub const TICK_RATE: u32 = 60;
