//! Image style transformation domain.
//!
//! The catalog of styles offered to the user, the pixel buffer type the
//! transforms operate on, and the async `StyleTransform` seam.

use serde::Serialize;

use crate::error::{BuddyError, Result, ValidationError};

/// A style the user can apply to an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationStyle {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Model that would render this style with real inference
    pub model: &'static str,
    pub prompt: &'static str,
}

/// The fixed style catalog.
pub const TRANSFORMATION_STYLES: &[TransformationStyle] = &[
    TransformationStyle {
        id: "portrait-sketch",
        name: "Portrait Sketch",
        description: "Highly detailed hand-drawn portrait with fine pencil strokes and grayscale shading",
        model: "vinesmsuic/portraitsketch-diffusion",
        prompt: "Transform this image into a highly detailed, hand-drawn portrait sketch.",
    },
    TransformationStyle {
        id: "ghibli",
        name: "Studio Ghibli",
        description: "Soft, dreamy animation style with vibrant colors and whimsical elements",
        model: "nitrosocke/Ghibli-Diffusion",
        prompt: "Reimagine this image in the style of a Studio Ghibli animated film.",
    },
    TransformationStyle {
        id: "anime",
        name: "Anime Style",
        description: "Bold lines, vibrant colors, and expressive anime aesthetics",
        model: "cagliostrolab/animagine-xl-3.1",
        prompt: "Convert this image into anime style artwork with clean, bold outlines.",
    },
    TransformationStyle {
        id: "watercolor",
        name: "Watercolor Painting",
        description: "Soft, flowing watercolor art with gentle color blending",
        model: "cyborgcamel/WatercolorDiffusion",
        prompt: "Transform this image into a delicate watercolor painting.",
    },
];

/// Looks up a style by id.
pub fn find_style(id: &str) -> Option<&'static TransformationStyle> {
    TRANSFORMATION_STYLES.iter().find(|style| style.id == id)
}

/// Upload limit, checked against the size of the uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Rejects uploads larger than `MAX_UPLOAD_BYTES`.
pub fn check_upload_size(size: usize) -> Result<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::ImageTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        }
        .into());
    }
    Ok(())
}

/// A decoded image together with the size of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub image: RgbaImage,
    /// Encoded size in bytes
    pub size: usize,
}

impl ImageUpload {
    pub fn new(image: RgbaImage, size: usize) -> Self {
        Self { image, size }
    }

    /// An upload with no encoded form, sized by its pixel buffer.
    pub fn from_pixels(image: RgbaImage) -> Self {
        let size = image.byte_len();
        Self { image, size }
    }
}

/// An 8-bit RGBA image, rows top to bottom, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    /// Wraps a pixel buffer, checking that its length matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(BuddyError::internal(format!(
                "RGBA buffer for {}x{} must be {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgba.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// The pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates lie outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ]
    }

    /// Overwrites the pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates lie outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[offset..offset + 4].copy_from_slice(&rgba);
    }
}

/// Applies a named style to an image.
///
/// Unknown style ids return the image unchanged.
#[async_trait::async_trait]
pub trait StyleTransform: Send + Sync {
    async fn transform(&self, image: RgbaImage, style_id: &str) -> Result<RgbaImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(TRANSFORMATION_STYLES.len(), 4);
        assert_eq!(find_style("ghibli").unwrap().name, "Studio Ghibli");
        assert!(find_style("cubism").is_none());
    }

    #[test]
    fn test_buffer_length_is_checked() {
        assert!(RgbaImage::new(2, 2, vec![0; 16]).is_ok());
        assert!(RgbaImage::new(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let mut image = RgbaImage::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(image.byte_len(), 24);
        image.set_pixel(2, 1, [9, 8, 7, 6]);
        assert_eq!(image.pixel(2, 1), [9, 8, 7, 6]);
        assert_eq!(image.pixel(0, 0), [1, 2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn test_pixel_out_of_bounds_panics() {
        let image = RgbaImage::filled(2, 2, [0, 0, 0, 0]);
        image.pixel(2, 0);
    }

    #[test]
    fn test_upload_size_limit() {
        assert!(check_upload_size(MAX_UPLOAD_BYTES).is_ok());
        let err = check_upload_size(MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::ImageTooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES,
            })
        );
        let upload = ImageUpload::from_pixels(RgbaImage::filled(2, 3, [0, 0, 0, 0]));
        assert_eq!(upload.size, 24);
    }
}
