//! Road scene: the loaded road group, its segments, and the per-frame
//! animation that makes the road rise and sway toward the camera.
//!
//! # Invariants
//! - A segment's initial transform is captured once and never mutated.
//! - The animator holds no per-segment state; each pose is a pure function
//!   of (initial transform, distance, scaled time).

pub mod animator;
pub mod road;

pub use animator::{RoadAnimator, SegmentPose};
pub use road::{RoadModel, RoadSegment, SegmentMesh};

pub fn crate_info() -> &'static str {
    "roadfly-scene v0.1.0"
}
