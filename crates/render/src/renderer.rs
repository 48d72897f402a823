use glam::Vec3;
use roadfly_scene::RoadModel;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    type Output;

    /// Render one frame of the road as seen from `view`.
    fn render(&self, road: &RoadModel, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the road's live state.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Print every segment instead of only the summary.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { verbose: true }
    }

    pub fn summary() -> Self {
        Self { verbose: false }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, road: &RoadModel, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Road ({} segments, {} triangles) ===",
            road.len(),
            road.total_triangles()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3} fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.yaw, view.pitch, view.fov_degrees
        );

        let bounds = road.world_bounds();
        if bounds.is_empty() {
            let _ = writeln!(out, "Bounds: empty");
        } else {
            let _ = writeln!(
                out,
                "Bounds: min=({:.2}, {:.2}, {:.2}) max=({:.2}, {:.2}, {:.2})",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            );
        }

        if self.verbose {
            for (i, segment) in road.segments().iter().enumerate() {
                let p = segment.transform.position;
                let r = segment.transform.rotation;
                let _ = writeln!(
                    out,
                    "  [{}] pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3})",
                    segment.label(i),
                    p.x,
                    p.y,
                    p.z,
                    r.x,
                    r.y,
                    r.z
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadfly_common::SegmentTransform;
    use roadfly_scene::{RoadSegment, SegmentMesh};

    fn road() -> RoadModel {
        let mesh = SegmentMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            normals: vec![Vec3::Y; 3],
            indices: vec![0, 2, 1],
        };
        RoadModel::new(vec![
            RoadSegment::new(Some("start".into()), SegmentTransform::default(), mesh.clone()),
            RoadSegment::new(
                None,
                SegmentTransform {
                    position: Vec3::new(0.0, 0.0, -3.0),
                    ..SegmentTransform::default()
                },
                mesh,
            ),
        ])
    }

    #[test]
    fn debug_renderer_empty_road() {
        let output = DebugTextRenderer::new().render(&RoadModel::new(Vec::new()), &RenderView::default());
        assert!(output.contains("0 segments"));
        assert!(output.contains("Bounds: empty"));
    }

    #[test]
    fn debug_renderer_lists_segments() {
        let output = DebugTextRenderer::new().render(&road(), &RenderView::default());
        assert!(output.contains("2 segments, 2 triangles"));
        assert!(output.contains("[start]"));
        assert!(output.contains("[segment_1] pos=(0.00, 0.00, -3.00)"));
    }

    #[test]
    fn summary_omits_segments() {
        let output = DebugTextRenderer::summary().render(&road(), &RenderView::default());
        assert!(output.contains("Bounds: min="));
        assert!(!output.contains("[start]"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.eye, Vec3::ZERO);
        assert_eq!(view.fov_degrees, 75.0);
    }
}
