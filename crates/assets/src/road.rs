use crate::AssetError;
use glam::{Mat3, Mat4, Quat, Vec3};
use roadfly_common::SegmentTransform;
use roadfly_scene::{RoadModel, RoadSegment, SegmentMesh};
use std::path::Path;

/// Load a road model from a glTF or GLB file.
///
/// Each root node of the default scene (or the first scene) becomes one
/// segment whose initial transform is the node's local transform.
pub fn load_road(path: impl AsRef<Path>) -> Result<RoadModel, AssetError> {
    let path = path.as_ref();
    let url = path.display().to_string();

    let (document, buffers, _images) = gltf::import(path).map_err(|source| AssetError::Gltf {
        url: url.clone(),
        source,
    })?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| AssetError::NoScene { url: url.clone() })?;

    let mut segments = Vec::new();
    for node in scene.nodes() {
        let (translation, rotation, scale) = node.transform().decomposed();
        let transform = SegmentTransform::from_trs(
            Vec3::from_array(translation),
            Quat::from_array(rotation),
            Vec3::from_array(scale),
        );

        let mut mesh = SegmentMesh::default();
        collect_meshes(&node, &buffers, Mat4::IDENTITY, &url, &mut mesh)?;

        tracing::debug!(
            name = node.name().unwrap_or("<unnamed>"),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "road segment"
        );
        segments.push(RoadSegment::new(node.name().map(String::from), transform, mesh));
    }

    let road = RoadModel::new(segments);
    tracing::info!(
        "loaded road {url}: {} segments, {} triangles",
        road.len(),
        road.total_triangles()
    );
    Ok(road)
}

/// Bake the meshes of `node` and its descendants into `out`, expressed in the
/// space `local` maps `node`'s space into.
fn collect_meshes(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    local: Mat4,
    url: &str,
    out: &mut SegmentMesh,
) -> Result<(), AssetError> {
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(
                    "skipping {:?} primitive on node {}",
                    primitive.mode(),
                    node.index()
                );
                continue;
            }
            let part = read_primitive(&primitive, buffers, node, url)?;
            out.append(&transform_mesh(&part, local));
        }
    }

    for child in node.children() {
        let child_local = local * Mat4::from_cols_array_2d(&child.transform().matrix());
        collect_meshes(&child, buffers, child_local, url, out)?;
    }

    Ok(())
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    node: &gltf::Node,
    url: &str,
) -> Result<SegmentMesh, AssetError> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingPositions {
            url: url.to_string(),
            node: node
                .name()
                .map(String::from)
                .unwrap_or_else(|| node.index().to_string()),
        })?
        .map(Vec3::from_array)
        .collect();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(normals) => normals.map(Vec3::from_array).collect(),
        None => smooth_normals(&positions, &indices),
    };

    Ok(SegmentMesh {
        positions,
        normals,
        indices,
    })
}

fn transform_mesh(mesh: &SegmentMesh, m: Mat4) -> SegmentMesh {
    if m == Mat4::IDENTITY {
        return mesh.clone();
    }
    let normal_matrix = Mat3::from_mat4(m).inverse().transpose();
    SegmentMesh {
        positions: mesh.positions.iter().map(|p| m.transform_point3(*p)).collect(),
        normals: mesh
            .normals
            .iter()
            .map(|n| (normal_matrix * *n).normalize_or_zero())
            .collect(),
        indices: mesh.indices.clone(),
    }
}

/// Area-weighted vertex normals for meshes exported without them.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_road;

    #[test]
    fn root_nodes_become_segments() {
        let dir = tempfile::tempdir().unwrap();
        let road = load_road(write_road(dir.path())).unwrap();

        assert_eq!(road.len(), 2);
        assert_eq!(road.position, RoadModel::DEFAULT_OFFSET);
        let a = &road.segments()[0];
        assert_eq!(a.name.as_deref(), Some("piece_a"));
        assert_eq!(a.initial().position, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(a.mesh.triangle_count(), 1);
    }

    #[test]
    fn child_meshes_are_baked_into_the_root_segment() {
        let dir = tempfile::tempdir().unwrap();
        let road = load_road(write_road(dir.path())).unwrap();

        let b = &road.segments()[1];
        assert_eq!(b.mesh.vertex_count(), 3);
        assert!(b.mesh.positions.iter().all(|p| (p.y - 1.0).abs() < 1e-6));
        assert!((b.initial().rotation.y - std::f32::consts::FRAC_PI_4).abs() < 1e-4);
    }

    #[test]
    fn missing_normals_are_generated() {
        let dir = tempfile::tempdir().unwrap();
        let road = load_road(write_road(dir.path())).unwrap();
        let mesh = &road.segments()[0].mesh;
        assert_eq!(mesh.normals.len(), 3);
        // Indices 0, 2, 1 wind counter-clockwise seen from above.
        assert!(mesh.normals.iter().all(|n| (*n - Vec3::Y).length() < 1e-6));
    }

    #[test]
    fn bounds_include_group_offset() {
        let dir = tempfile::tempdir().unwrap();
        let road = load_road(write_road(dir.path())).unwrap();
        let b = road.world_bounds();
        assert!((b.max.x - 1.5).abs() < 1e-5);
        assert!((b.min.y + 0.25).abs() < 1e-5);
        assert!(b.min.z < -9.0);
    }

    #[test]
    fn missing_file_names_the_resource() {
        let err = load_road("/nonexistent/road.glb").unwrap_err();
        assert!(matches!(err, AssetError::Gltf { .. }));
        assert_eq!(err.url(), "/nonexistent/road.glb");
        assert!(err.to_string().starts_with("[Loading error] /nonexistent/road.glb"));
    }

    #[test]
    fn smooth_normals_skip_out_of_range_indices() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let normals = smooth_normals(&positions, &[0, 2, 1, 0, 9, 1]);
        assert_eq!(normals.len(), 3);
        assert!((normals[0] - Vec3::Y).length() < 1e-6);
    }
}
