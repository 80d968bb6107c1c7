//! Core deterministic primitives.
//!
//! Geometry, randomness and hashing shared by every game module. Nothing
//! here knows about bacteria or pits.

pub mod vec2;
pub mod dish;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::{Vec2, normalize_degrees};
pub use dish::{DISH_CENTER, DISH_RADIUS, SPRITE_WIDTH};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
