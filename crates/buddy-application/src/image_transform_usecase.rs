//! Image style workflow use case.
//!
//! Select an image, select a style, transform. Selecting a new image clears
//! the previous result, and a result computed for an image that has since
//! been replaced is discarded.

use std::sync::Arc;

use tokio::sync::Mutex;

use buddy_core::error::{BuddyError, Result, ValidationError};
use buddy_core::style::{
    ImageUpload, RgbaImage, StyleTransform, TransformationStyle, check_upload_size, find_style,
};

#[derive(Debug, Default)]
struct WorkflowState {
    image: Option<RgbaImage>,
    /// Bumped whenever the image is replaced or cleared
    image_generation: u64,
    style: Option<&'static TransformationStyle>,
    result: Option<RgbaImage>,
    loading: bool,
}

/// Drives one image through a `StyleTransform`.
pub struct ImageTransformUseCase {
    transform: Arc<dyn StyleTransform>,
    state: Mutex<WorkflowState>,
}

impl ImageTransformUseCase {
    pub fn new(transform: Arc<dyn StyleTransform>) -> Self {
        Self {
            transform,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    /// Replaces the source image and clears any previous result.
    pub async fn select_image(&self, upload: ImageUpload) -> Result<()> {
        check_upload_size(upload.size)?;

        let mut state = self.state.lock().await;
        state.image = Some(upload.image);
        state.image_generation += 1;
        state.result = None;
        state.loading = false;
        Ok(())
    }

    pub async fn select_style(&self, style_id: &str) -> Result<()> {
        let style = find_style(style_id).ok_or_else(|| BuddyError::not_found("style", style_id))?;
        self.state.lock().await.style = Some(style);
        Ok(())
    }

    /// Drops image, style and result.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.image = None;
        state.image_generation += 1;
        state.style = None;
        state.result = None;
        state.loading = false;
    }

    /// Runs the selected style over the selected image.
    ///
    /// Returns `Ok(None)` when the image was replaced while the transform
    /// ran; that result is dropped.
    pub async fn transform(&self) -> Result<Option<RgbaImage>> {
        let (image, style, generation) = {
            let mut state = self.state.lock().await;
            let (Some(image), Some(style)) = (state.image.clone(), state.style) else {
                return Err(ValidationError::IncompleteTransform.into());
            };
            state.loading = true;
            (image, style, state.image_generation)
        };

        tracing::info!("[ImageTransformUseCase] Applying {} style", style.name);
        let outcome = self.transform.transform(image, style.id).await;

        let mut state = self.state.lock().await;
        if state.image_generation != generation {
            tracing::debug!("[ImageTransformUseCase] Image replaced during transform, discarding result");
            return Ok(None);
        }
        state.loading = false;

        let result = outcome?;
        state.result = Some(result.clone());
        Ok(Some(result))
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn result(&self) -> Option<RgbaImage> {
        self.state.lock().await.result.clone()
    }

    pub async fn selected_style(&self) -> Option<&'static TransformationStyle> {
        self.state.lock().await.style
    }

    pub async fn has_image(&self) -> bool {
        self.state.lock().await.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CanvasStyleTransform;
    use buddy_core::style::MAX_UPLOAD_BYTES;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_transform_requires_image_and_style() {
        let usecase = ImageTransformUseCase::new(Arc::new(CanvasStyleTransform));
        let err = usecase.transform().await.unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::IncompleteTransform));

        usecase
            .select_image(ImageUpload::from_pixels(RgbaImage::filled(1, 1, [1, 2, 3, 4])))
            .await
            .unwrap();
        assert!(usecase.transform().await.is_err());

        usecase.select_style("portrait-sketch").await.unwrap();
        assert_eq!(usecase.selected_style().await.unwrap().name, "Portrait Sketch");
        let out = usecase.transform().await.unwrap().unwrap();
        assert_eq!(out.pixel(0, 0), [2, 2, 2, 4]);
        assert_eq!(usecase.result().await, Some(out));
        assert!(!usecase.is_loading().await);
    }

    #[tokio::test]
    async fn test_rejects_oversized_image() {
        let usecase = ImageTransformUseCase::new(Arc::new(CanvasStyleTransform));
        let upload = ImageUpload::new(
            RgbaImage::filled(1, 1, [0, 0, 0, 0]),
            MAX_UPLOAD_BYTES + 1,
        );
        let err = usecase.select_image(upload).await.unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::ImageTooLarge { .. })
        ));
        assert!(!usecase.has_image().await);

        // The limit applies to the encoded file, not the decoded pixels
        let large_pixels = RgbaImage::filled(1024, 1281, [0, 0, 0, 0]);
        usecase
            .select_image(ImageUpload::new(large_pixels, 64 * 1024))
            .await
            .unwrap();
        assert!(usecase.has_image().await);
    }

    #[tokio::test]
    async fn test_unknown_style_is_not_found() {
        let usecase = ImageTransformUseCase::new(Arc::new(CanvasStyleTransform));
        assert!(usecase.select_style("cubism").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_new_image_clears_result() {
        let usecase = ImageTransformUseCase::new(Arc::new(CanvasStyleTransform));
        usecase
            .select_image(ImageUpload::from_pixels(RgbaImage::filled(1, 1, [9, 9, 9, 9])))
            .await
            .unwrap();
        usecase.select_style("ghibli").await.unwrap();
        usecase.transform().await.unwrap();
        assert!(usecase.result().await.is_some());

        usecase
            .select_image(ImageUpload::from_pixels(RgbaImage::filled(1, 1, [0, 0, 0, 0])))
            .await
            .unwrap();
        assert!(usecase.result().await.is_none());

        usecase.reset().await;
        assert!(!usecase.has_image().await);
        assert!(usecase.selected_style().await.is_none());
    }

    /// Blocks inside `transform` until released.
    struct GatedTransform {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl StyleTransform for GatedTransform {
        async fn transform(&self, image: RgbaImage, _style_id: &str) -> Result<RgbaImage> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(image)
        }
    }

    #[tokio::test]
    async fn test_result_for_replaced_image_is_discarded() {
        let gate = Arc::new(GatedTransform {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let usecase = Arc::new(ImageTransformUseCase::new(gate.clone()));
        usecase
            .select_image(ImageUpload::from_pixels(RgbaImage::filled(1, 1, [1, 1, 1, 1])))
            .await
            .unwrap();
        usecase.select_style("anime").await.unwrap();

        let running = {
            let usecase = usecase.clone();
            tokio::spawn(async move { usecase.transform().await })
        };

        gate.entered.notified().await;
        assert!(usecase.is_loading().await);
        usecase
            .select_image(ImageUpload::from_pixels(RgbaImage::filled(1, 1, [2, 2, 2, 2])))
            .await
            .unwrap();
        assert!(!usecase.is_loading().await);
        gate.release.notify_one();

        assert_eq!(running.await.unwrap().unwrap(), None);
        assert!(usecase.result().await.is_none());
    }
}
