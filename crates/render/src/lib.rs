//! Renderer-agnostic interface for the road scene.
//!
//! Renderers read the road and a view; they never mutate either. The GPU
//! backend lives in `roadfly-render-wgpu`; the text renderer here backs the
//! CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "roadfly-render v0.1.0"
}
