//! Asset loading: the road model (glTF / GLB) and the matcap texture.
//!
//! Every error carries the identifier of the resource that failed. Loading
//! failures are fatal for the caller; nothing here retries.
//!
//! # Layout
//! Root nodes of the document's default scene become road segments. Meshes on
//! descendant nodes are baked into their root segment's local space.

mod manager;
mod matcap;
mod road;

pub use manager::{LoadedAssets, LoadingManager};
pub use matcap::{MatcapImage, load_matcap};
pub use road::load_road;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("[Loading error] {url}: {source}")]
    Gltf {
        url: String,
        #[source]
        source: gltf::Error,
    },
    #[error("[Loading error] {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },
    #[error("[Loading error] {url}: document has no scene")]
    NoScene { url: String },
    #[error("[Loading error] {url}: primitive on node {node} has no positions")]
    MissingPositions { url: String, node: String },
    #[error("[Loading error] {url}: loader stopped before reporting a result")]
    Interrupted { url: String },
}

impl AssetError {
    /// Identifier of the resource that failed to load.
    pub fn url(&self) -> &str {
        match self {
            AssetError::Gltf { url, .. }
            | AssetError::Image { url, .. }
            | AssetError::NoScene { url }
            | AssetError::MissingPositions { url, .. }
            | AssetError::Interrupted { url } => url,
        }
    }
}

pub fn crate_info() -> &'static str {
    "roadfly-assets v0.1.0"
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    /// Two-segment road: a bare triangle, and a rotated node whose child
    /// carries the same triangle one unit up.
    const ROAD_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0, 1] }],
  "nodes": [
    { "name": "piece_a", "mesh": 0, "translation": [1.0, 0.0, -2.0] },
    { "name": "piece_b", "translation": [0.0, 0.0, -4.0],
      "rotation": [0.0, 0.38268343, 0.0, 0.9238795], "children": [2] },
    { "mesh": 0, "translation": [0.0, 1.0, 0.0] }
  ],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
  "buffers": [{ "uri": "road.bin", "byteLength": 44 }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [-0.5, 0.0, -0.5], "max": [0.5, 0.0, 0.5] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ]
}"#;

    fn road_bin() -> Vec<u8> {
        let positions: [f32; 9] = [-0.5, 0.0, -0.5, 0.5, 0.0, -0.5, 0.5, 0.0, 0.5];
        let indices: [u16; 3] = [0, 2, 1];
        let mut bytes = Vec::with_capacity(44);
        for p in positions {
            bytes.extend_from_slice(&p.to_le_bytes());
        }
        for i in indices {
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        bytes.resize(44, 0);
        bytes
    }

    pub(crate) fn write_road(dir: &Path) -> PathBuf {
        std::fs::write(dir.join("road.bin"), road_bin()).unwrap();
        let path = dir.join("road.gltf");
        std::fs::write(&path, ROAD_GLTF).unwrap();
        path
    }

    pub(crate) fn write_matcap(dir: &Path) -> PathBuf {
        let path = dir.join("matcap.png");
        let img = image::RgbaImage::from_fn(4, 4, |x, y| {
            image::Rgba([(x * 60) as u8, (y * 60) as u8, 128, 255])
        });
        img.save(&path).unwrap();
        path
    }
}
