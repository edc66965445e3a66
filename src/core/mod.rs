//! Core deterministic primitives.
//!
//! Vector algebra, scalar helpers, seeded randomness and state hashing.
//! Nothing in here knows about table tennis.

pub mod vec3;
pub mod math;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec3::Vec3;
pub use math::{clamp, clamp01, lerp};
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
