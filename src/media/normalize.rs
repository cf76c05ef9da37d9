/// Upload normalization
///
/// Decodes an uploaded image, bounds its longer edge, and re-encodes it
/// as a JPEG data URL that can be stored and displayed on its own.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::PathBuf;

use crate::config::{DEFAULT_MAX_EDGE, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::UploadError;

/// Prefix of every normalized payload
pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub max_upload_bytes: u64,
    pub max_edge: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_edge: DEFAULT_MAX_EDGE,
            quality: 80,
        }
    }
}

/// Reject uploads over the size cap before any other work happens
pub fn check_size(byte_size: u64, options: &NormalizeOptions) -> Result<(), UploadError> {
    if byte_size > options.max_upload_bytes {
        return Err(UploadError::Oversized {
            size: byte_size,
            limit: options.max_upload_bytes,
        });
    }
    Ok(())
}

/// Output dimensions: the longer edge is capped at `max_edge`, the other
/// edge scales with it (truncated, never below 1 pixel)
pub fn target_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let scale = |edge: u32, long: u32| -> u32 {
        ((edge as f64 * max_edge as f64 / long as f64) as u32).max(1)
    };

    if width > height {
        if width > max_edge {
            return (max_edge, scale(height, width));
        }
    } else if height > max_edge {
        return (scale(width, height), max_edge);
    }

    (width, height)
}

/// Normalize an in-memory upload of `byte_size` bytes into a data URL
pub fn normalize(bytes: &[u8], byte_size: u64, options: &NormalizeOptions) -> Result<String, UploadError> {
    check_size(byte_size, options)?;

    let img = image::load_from_memory(bytes)?;
    let (width, height) = target_dimensions(img.width(), img.height(), options.max_edge);

    let img = if (width, height) != (img.width(), img.height()) {
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, options.quality).encode_image(&rgb)?;

    tracing::info!(
        "📸 Normalized upload: {}x{}, {} bytes -> {} bytes",
        width,
        height,
        byte_size,
        jpeg.len()
    );

    Ok(format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(&jpeg)))
}

/// Read and normalize an image file off the UI thread.
///
/// The size cap is checked against file metadata, so oversized files are
/// never read.
pub async fn load_upload(path: PathBuf, options: NormalizeOptions) -> Result<String, UploadError> {
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| UploadError::Read(format!("{}: {}", path.display(), e)))?;
    check_size(metadata.len(), &options)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| UploadError::Read(format!("{}: {}", path.display(), e)))?;

    // Spawn blocking because decoding and encoding are CPU-intensive
    tokio::task::spawn_blocking(move || normalize(&bytes, bytes.len() as u64, &options))
        .await
        .map_err(|e| UploadError::ImageProcessing(format!("Task join error: {}", e)))?
}

/// Decode the bytes of a base64 data URL (any media type)
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let (header, payload) = data_url.split_once(',')?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn decoded_dimensions(data_url: &str) -> (u32, u32) {
        let bytes = decode_data_url(data_url).unwrap();
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_normalize_produces_jpeg_data_url() {
        let bytes = png(6, 4);
        let url = normalize(&bytes, bytes.len() as u64, &NormalizeOptions::default()).unwrap();

        assert!(url.starts_with(JPEG_DATA_URL_PREFIX));
        assert_eq!(decoded_dimensions(&url), (6, 4));
    }

    #[test]
    fn test_normalize_downscales_longer_edge() {
        let options = NormalizeOptions {
            max_edge: 10,
            ..NormalizeOptions::default()
        };

        let wide = png(40, 20);
        let url = normalize(&wide, wide.len() as u64, &options).unwrap();
        assert_eq!(decoded_dimensions(&url), (10, 5));

        let tall = png(20, 40);
        let url = normalize(&tall, tall.len() as u64, &options).unwrap();
        assert_eq!(decoded_dimensions(&url), (5, 10));
    }

    #[test]
    fn test_oversized_upload_rejected_before_decoding() {
        let options = NormalizeOptions::default();
        let err = normalize(b"not an image", 5 * 1024 * 1024 + 1, &options).unwrap_err();
        assert_eq!(
            err,
            UploadError::Oversized {
                size: 5_242_881,
                limit: 5_242_880
            }
        );

        // Exactly at the cap is allowed through to decoding
        let err = normalize(b"not an image", 5 * 1024 * 1024, &options).unwrap_err();
        assert!(matches!(err, UploadError::ImageProcessing(_)));
    }

    #[test]
    fn test_target_dimensions() {
        let max = DEFAULT_MAX_EDGE;
        // Realistic photos are never touched by the literal cap
        assert_eq!(target_dimensions(4000, 3000, max), (4000, 3000));

        assert_eq!(target_dimensions(3000, 1000, 1500), (1500, 500));
        assert_eq!(target_dimensions(1000, 3000, 1500), (500, 1500));
        assert_eq!(target_dimensions(2000, 2000, 1000), (1000, 1000));
        assert_eq!(target_dimensions(5000, 1, 100), (100, 1));
        assert_eq!(target_dimensions(100, 33, 10), (10, 3));
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_data_url("data:image/jpeg;base64,AAEC"), Some(vec![0, 1, 2]));
        assert_eq!(decode_data_url("data:image/jpeg,AAEC"), None);
        assert_eq!(decode_data_url("garbage"), None);
    }

    #[tokio::test]
    async fn test_load_upload_missing_file() {
        let result = load_upload(
            PathBuf::from("/nonexistent/story.png"),
            NormalizeOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(UploadError::Read(_))));
    }

    #[tokio::test]
    async fn test_load_upload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.png");
        std::fs::write(&path, png(3, 5)).unwrap();

        let url = load_upload(path, NormalizeOptions::default()).await.unwrap();
        assert_eq!(decoded_dimensions(&url), (3, 5));
    }

    #[tokio::test]
    async fn test_load_upload_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let options = NormalizeOptions {
            max_upload_bytes: 10,
            ..NormalizeOptions::default()
        };
        let result = load_upload(path, options).await;
        assert_eq!(result, Err(UploadError::Oversized { size: 64, limit: 10 }));
    }
}
