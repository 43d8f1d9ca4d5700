use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use colored::Colorize;

use buddy_application::{CanvasStyleTransform, ImageTransformUseCase};
use buddy_infrastructure::{read_image, write_image};

/// Applies a style to an image file and writes the result.
pub async fn run(input: &Path, style_id: &str, output: &Path) -> Result<()> {
    let usecase = ImageTransformUseCase::new(Arc::new(CanvasStyleTransform::new()));

    usecase.select_image(read_image(input)?).await?;
    usecase.select_style(style_id).await?;

    let Some(result) = usecase.transform().await? else {
        bail!("Image changed while the transform was running");
    };
    write_image(output, &result)?;

    let style = usecase
        .selected_style()
        .await
        .map_or(style_id, |style| style.name);
    println!(
        "{} {} -> {}",
        format!("{}:", style).bright_green(),
        input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::error::{BuddyError, ValidationError};
    use buddy_core::style::{MAX_UPLOAD_BYTES, RgbaImage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_transform_writes_styled_image() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.png");
        let output = temp_dir.path().join("sketch.png");
        write_image(&input, &RgbaImage::filled(2, 2, [1, 2, 2, 255])).unwrap();

        run(&input, "portrait-sketch", &output).await.unwrap();

        let styled = read_image(&output).unwrap().image;
        assert_eq!(styled, RgbaImage::filled(2, 2, [2, 2, 2, 255]));
    }

    #[tokio::test]
    async fn test_transform_rejects_oversized_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("huge.png");
        let output = temp_dir.path().join("out.png");
        std::fs::write(&input, vec![0u8; MAX_UPLOAD_BYTES + 1]).unwrap();

        let err = run(&input, "ghibli", &output).await.unwrap_err();
        let err = err.downcast_ref::<BuddyError>().unwrap();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::ImageTooLarge { .. })
        ));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_transform_rejects_unknown_style() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.png");
        let output = temp_dir.path().join("out.png");
        write_image(&input, &RgbaImage::filled(1, 1, [0, 0, 0, 255])).unwrap();

        let err = run(&input, "cubism", &output).await.unwrap_err();
        assert!(err.downcast_ref::<BuddyError>().unwrap().is_not_found());
        assert!(!output.exists());
    }
}
