use glam::{Mat4, Vec3};
use roadfly_common::{Aabb, SegmentTransform};
use serde::Serialize;

/// Triangle mesh in segment-local space.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl SegmentMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append another mesh already expressed in this mesh's space.
    pub fn append(&mut self, other: &SegmentMesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// One piece of the road.
#[derive(Debug, Clone, Serialize)]
pub struct RoadSegment {
    pub name: Option<String>,
    initial: SegmentTransform,
    /// Live local transform, rewritten by the animator every frame.
    pub transform: SegmentTransform,
    pub mesh: SegmentMesh,
}

impl RoadSegment {
    /// Create a segment; `transform` is captured as its initial transform.
    pub fn new(name: Option<String>, transform: SegmentTransform, mesh: SegmentMesh) -> Self {
        Self {
            name,
            initial: transform,
            transform,
            mesh,
        }
    }

    pub fn initial(&self) -> &SegmentTransform {
        &self.initial
    }

    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("segment_{index}"))
    }
}

/// The loaded road group.
#[derive(Debug, Clone, Serialize)]
pub struct RoadModel {
    /// Translation of the whole group.
    pub position: Vec3,
    segments: Vec<RoadSegment>,
}

impl RoadModel {
    /// Group offset applied on load: a bit down and halfway forward.
    pub const DEFAULT_OFFSET: Vec3 = Vec3::new(0.0, -0.25, -5.0);

    pub fn new(segments: Vec<RoadSegment>) -> Self {
        Self {
            position: Self::DEFAULT_OFFSET,
            segments,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [RoadSegment] {
        &mut self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }

    /// World matrix of a segment from its live transform.
    pub fn world_matrix(&self, segment: &RoadSegment) -> Mat4 {
        self.group_matrix() * segment.transform.matrix()
    }

    pub fn world_position(&self, segment: &RoadSegment) -> Vec3 {
        self.group_matrix()
            .transform_point3(segment.transform.position)
    }

    /// World-space box around every vertex, using the initial transforms.
    pub fn world_bounds(&self) -> Aabb {
        let group = self.group_matrix();
        let mut bounds = Aabb::empty();
        for segment in &self.segments {
            let m = group * segment.initial.matrix();
            if segment.mesh.is_empty() {
                bounds.expand_by_point(m.transform_point3(Vec3::ZERO));
                continue;
            }
            for p in &segment.mesh.positions {
                bounds.expand_by_point(m.transform_point3(*p));
            }
        }
        bounds
    }

    pub fn total_triangles(&self) -> usize {
        self.segments.iter().map(|s| s.mesh.triangle_count()).sum()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Unit quad on the XZ plane, centered on the origin.
    pub(crate) fn quad() -> SegmentMesh {
        SegmentMesh {
            positions: vec![
                Vec3::new(-0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, 0.5),
                Vec3::new(-0.5, 0.0, 0.5),
            ],
            normals: vec![Vec3::Y; 4],
            indices: vec![0, 2, 1, 0, 3, 2],
        }
    }

    pub(crate) fn segment_at(position: Vec3) -> RoadSegment {
        RoadSegment::new(
            None,
            SegmentTransform {
                position,
                ..SegmentTransform::default()
            },
            quad(),
        )
    }

    #[test]
    fn new_model_uses_default_offset() {
        let road = RoadModel::new(vec![segment_at(Vec3::ZERO)]);
        assert_eq!(road.position, Vec3::new(0.0, -0.25, -5.0));
        assert_eq!(road.world_position(&road.segments()[0]), road.position);
    }

    #[test]
    fn bounds_cover_all_segments_in_world_space() {
        let road = RoadModel::new(vec![
            segment_at(Vec3::new(0.0, 0.0, 4.0)),
            segment_at(Vec3::new(0.0, 0.0, -4.0)),
        ]);
        let b = road.world_bounds();
        assert_eq!(b.min, Vec3::new(-0.5, -0.25, -9.5));
        assert_eq!(b.max, Vec3::new(0.5, -0.25, -0.5));
    }

    #[test]
    fn bounds_ignore_live_animation() {
        let mut road = RoadModel::new(vec![segment_at(Vec3::ZERO)]);
        let before = road.world_bounds();
        road.segments_mut()[0].transform.position.y = 10.0;
        assert_eq!(road.world_bounds(), before);
    }

    #[test]
    fn empty_road_has_empty_bounds() {
        let road = RoadModel::new(Vec::new());
        assert!(road.world_bounds().is_empty());
        assert!(road.is_empty());
    }

    #[test]
    fn append_offsets_indices() {
        let mut m = quad();
        m.append(&quad());
        assert_eq!(m.vertex_count(), 8);
        assert_eq!(m.triangle_count(), 4);
        assert_eq!(m.indices[6], 4);
    }

    #[test]
    fn labels_fall_back_to_index() {
        let s = segment_at(Vec3::ZERO);
        assert_eq!(s.label(3), "segment_3");
    }
}
