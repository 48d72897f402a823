//! wgpu render backend for the road scene.
//!
//! Road segments are drawn matcap-shaded, fading into an exponential-squared
//! fog that matches the white background. All segments share one vertex and
//! index buffer; each draw selects its segment's model matrix from the
//! instance buffer.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{FogSettings, RoadRenderer};
pub use mesh::{PackedRoad, SegmentRange, Vertex, pack_road};
