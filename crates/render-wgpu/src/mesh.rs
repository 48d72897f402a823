use bytemuck::{Pod, Zeroable};
use roadfly_scene::RoadModel;
use std::ops::Range;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Where one segment lives in the shared buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRange {
    pub indices: Range<u32>,
    pub base_vertex: i32,
}

/// Every segment's mesh concatenated into one vertex and one index list.
/// Indices stay segment-relative; `base_vertex` rebases them at draw time.
#[derive(Debug, Default)]
pub struct PackedRoad {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub ranges: Vec<SegmentRange>,
}

pub fn pack_road(road: &RoadModel) -> PackedRoad {
    let mut packed = PackedRoad::default();
    for segment in road.segments() {
        let mesh = &segment.mesh;
        let base_vertex = packed.vertices.len() as i32;
        let start = packed.indices.len() as u32;

        packed
            .vertices
            .extend(mesh.positions.iter().enumerate().map(|(i, p)| Vertex {
                position: p.to_array(),
                normal: mesh.normals.get(i).map_or([0.0, 1.0, 0.0], |n| n.to_array()),
            }));
        packed.indices.extend_from_slice(&mesh.indices);

        packed.ranges.push(SegmentRange {
            indices: start..packed.indices.len() as u32,
            base_vertex,
        });
    }
    packed
}
