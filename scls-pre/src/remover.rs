//! Background removal seam
//!
//! Segmentation itself is an external model. The pipeline only needs
//! something that takes a decoded image and eventually hands back one image
//! whose alpha channel marks the background, or fails.

use crate::Result;
use async_trait::async_trait;
use image::RgbaImage;

#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Return `image` with background pixels made transparent
    async fn remove_background(&self, image: RgbaImage) -> Result<RgbaImage>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Keeps every pixel; for images shot against a plain backdrop and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRemover;

#[async_trait]
impl BackgroundRemover for PassthroughRemover {
    async fn remove_background(&self, image: RgbaImage) -> Result<RgbaImage> {
        Ok(image)
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[tokio::test]
    async fn test_passthrough_keeps_pixels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128]));
        let out = PassthroughRemover
            .remove_background(image.clone())
            .await
            .unwrap();
        assert_eq!(out, image);
        assert_eq!(PassthroughRemover.name(), "passthrough");
    }
}
