//! Reading and writing image files for the style workflow.
//!
//! PNG and JPEG are supported. Decoded images are RGBA8; JPEG output drops
//! the alpha channel.

use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat};

use buddy_core::error::{BuddyError, Result};
use buddy_core::style::{ImageUpload, RgbaImage, check_upload_size};

fn codec_error(path: &Path, err: ImageError) -> BuddyError {
    BuddyError::Serialization {
        format: "image".to_string(),
        message: format!("{}: {}", path.display(), err),
    }
}

/// Reads and decodes an image file.
///
/// Files over the upload limit are rejected before they are read.
pub fn read_image(path: &Path) -> Result<ImageUpload> {
    let metadata = fs::metadata(path)
        .map_err(|e| BuddyError::io(format!("Failed to open {}: {}", path.display(), e)))?;
    check_upload_size(metadata.len() as usize)?;

    let bytes = fs::read(path)
        .map_err(|e| BuddyError::io(format!("Failed to read {}: {}", path.display(), e)))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| codec_error(path, e))?
        .to_rgba8();

    let (width, height) = decoded.dimensions();
    let image = RgbaImage::new(width, height, decoded.into_raw())?;
    tracing::debug!(
        "[ImageFile] Decoded {} ({}x{}, {} bytes)",
        path.display(),
        width,
        height,
        bytes.len()
    );
    Ok(ImageUpload::new(image, bytes.len()))
}

/// Encodes an image, choosing the format from the file extension.
pub fn write_image(path: &Path, image: &RgbaImage) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| codec_error(path, e))?;
    let buffer = image::RgbaImage::from_raw(image.width(), image.height(), image.pixels().to_vec())
        .ok_or_else(|| BuddyError::internal("RGBA buffer does not match its dimensions"))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(buffer)
            .to_rgb8()
            .save_with_format(path, format),
        _ => buffer.save_with_format(path, format),
    }
    .map_err(|e| codec_error(path, e))?;

    tracing::debug!("[ImageFile] Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::error::ValidationError;
    use buddy_core::style::MAX_UPLOAD_BYTES;
    use tempfile::TempDir;

    #[test]
    fn test_png_round_trip_keeps_pixels() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/picture.png");

        let mut image = RgbaImage::filled(3, 2, [10, 20, 30, 255]);
        image.set_pixel(2, 1, [200, 100, 0, 128]);
        write_image(&path, &image).unwrap();

        let upload = read_image(&path).unwrap();
        assert_eq!(upload.image, image);
        assert_eq!(upload.size as u64, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("huge.png");
        fs::write(&path, vec![0u8; MAX_UPLOAD_BYTES + 1]).unwrap();

        let err = read_image(&path).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_undecodable_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.png");
        fs::write(&path, b"not an image").unwrap();

        let err = read_image(&path).unwrap_err();
        assert!(matches!(err, BuddyError::Serialization { ref format, .. } if format == "image"));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let image = RgbaImage::filled(1, 1, [0, 0, 0, 0]);
        assert!(write_image(&temp_dir.path().join("picture.xyz"), &image).is_err());
    }
}
