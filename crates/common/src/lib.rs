//! Shared value types used by every roadfly crate.
//!
//! # Invariants
//! - All types here are plain `Copy` values; nothing owns scene state.

mod bounds;
mod types;

pub use bounds::Aabb;
pub use types::SegmentTransform;
