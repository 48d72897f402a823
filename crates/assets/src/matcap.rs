use crate::AssetError;
use std::path::Path;

/// Decoded matcap texture, tightly packed RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcapImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl MatcapImage {
    /// Single-texel fallback used until a matcap is loaded.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

pub fn load_matcap(path: impl AsRef<Path>) -> Result<MatcapImage, AssetError> {
    let path = path.as_ref();
    let url = path.display().to_string();

    let img = image::open(path)
        .map_err(|source| AssetError::Image {
            url: url.clone(),
            source,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    tracing::info!("loaded matcap {url}: {width}x{height}");

    Ok(MatcapImage {
        width,
        height,
        rgba: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_matcap;

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let m = load_matcap(write_matcap(dir.path())).unwrap();
        assert_eq!((m.width, m.height), (4, 4));
        assert_eq!(m.rgba.len(), 64);
        assert_eq!(m.bytes_per_row(), 16);
        // Texel (1, 2).
        let i = ((2 * 4 + 1) * 4) as usize;
        assert_eq!(&m.rgba[i..i + 4], &[60, 120, 128, 255]);
    }

    #[test]
    fn missing_image_is_an_error() {
        let err = load_matcap("/nonexistent/matcap.png").unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
        assert!(err.to_string().contains("/nonexistent/matcap.png"));
    }

    #[test]
    fn solid_is_one_texel() {
        let m = MatcapImage::solid([255, 255, 255, 255]);
        assert_eq!(m.rgba.len(), 4);
    }
}
