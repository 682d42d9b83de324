//! Image preprocessing pipeline
//!
//! decode → optional size cap → background removal → composite on white →
//! crop to the non-white bounding box → resize → `[1][H][W][3]` tensor.
//!
//! The pixel stages are plain synchronous functions; `ImagePreprocessor`
//! strings them together and runs the heavy ones on the blocking pool.

use crate::error::{PreprocessError, Result};
use crate::remover::BackgroundRemover;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Model input as nested lists: batch, rows, columns, RGB in 0..=255
pub type PixelTensor = Vec<Vec<Vec<Vec<f64>>>>;

/// Per-channel distance from 255 still counted as white
pub const WHITE_TOLERANCE: u8 = 5;

/// Model input edge length
pub const TARGET_SIZE: u32 = 1024;

/// Longest source edge kept before background removal
pub const MAX_SOURCE_DIM: u32 = 2000;

/// JPEG quality for segmented output files
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    pub width: u32,
    pub height: u32,
    pub tolerance: u8,
    /// Downscale larger sources before background removal
    pub max_source_dim: Option<u32>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            tolerance: WHITE_TOLERANCE,
            max_source_dim: Some(MAX_SOURCE_DIM),
        }
    }
}

/// Pixel rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Shrink `image` so its longest edge is at most `max_dim` (Lanczos)
pub fn cap_size(image: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dim || max_dim == 0 {
        return image;
    }

    let scale = |side: u32| ((u64::from(side) * u64::from(max_dim) / u64::from(longest)) as u32).max(1);
    let (new_width, new_height) = (scale(width), scale(height));
    debug!(
        "Capping {}x{} source to {}x{}",
        width, height, new_width, new_height
    );
    image.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

fn blend_on_white(channel: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(channel) * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Flatten transparency onto a white canvas
pub fn composite_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        Rgb([blend_on_white(r, a), blend_on_white(g, a), blend_on_white(b, a)])
    })
}

pub fn is_white(pixel: &Rgb<u8>, tolerance: u8) -> bool {
    let floor = 255 - tolerance;
    pixel.0.iter().all(|c| *c >= floor)
}

/// Smallest rectangle holding every non-white pixel; `None` if all white
pub fn non_white_bounds(image: &RgbImage, tolerance: u8) -> Option<Bounds> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if is_white(pixel, tolerance) {
            continue;
        }
        found = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    found.then(|| Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Crop away white margins; an all-white image comes back unchanged
pub fn crop_non_white(image: RgbImage, tolerance: u8) -> RgbImage {
    match non_white_bounds(&image, tolerance) {
        Some(b) => imageops::crop_imm(&image, b.x, b.y, b.width, b.height).to_image(),
        None => image,
    }
}

/// Resize to `width`x`height` (triangle filter) and expand to nested lists
pub fn to_tensor(image: &RgbImage, width: u32, height: u32) -> Result<PixelTensor> {
    if width == 0 || height == 0 {
        return Err(PreprocessError::InvalidDimensions { width, height });
    }

    let resized;
    let source = if image.dimensions() == (width, height) {
        image
    } else {
        resized = imageops::resize(image, width, height, FilterType::Triangle);
        &resized
    };

    let rows = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let Rgb([r, g, b]) = *source.get_pixel(x, y);
                    vec![f64::from(r), f64::from(g), f64::from(b)]
                })
                .collect()
        })
        .collect();

    Ok(vec![rows])
}

/// Write an RGB image as JPEG
pub fn save_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    encoder
        .encode_image(image)
        .map_err(|e| PreprocessError::Encode(e.to_string()))
}

async fn decode(path: &Path) -> Result<DynamicImage> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image::open(&path).map_err(|source| PreprocessError::Decode { path, source })
    })
    .await?
}

/// Background removal and tensor extraction for one image at a time
pub struct ImagePreprocessor {
    remover: Option<Arc<dyn BackgroundRemover>>,
    options: PreprocessOptions,
}

impl ImagePreprocessor {
    /// A preprocessor with no remover; calls fail until `init`
    pub fn new(options: PreprocessOptions) -> Self {
        Self {
            remover: None,
            options,
        }
    }

    pub fn with_remover(options: PreprocessOptions, remover: Arc<dyn BackgroundRemover>) -> Self {
        let mut preprocessor = Self::new(options);
        preprocessor.init(remover);
        preprocessor
    }

    /// Install the background remover
    pub fn init(&mut self, remover: Arc<dyn BackgroundRemover>) {
        info!("Image preprocessor using '{}' background remover", remover.name());
        self.remover = Some(remover);
    }

    pub fn is_initialized(&self) -> bool {
        self.remover.is_some()
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    fn remover(&self) -> Result<&Arc<dyn BackgroundRemover>> {
        self.remover.as_ref().ok_or(PreprocessError::NotInitialized)
    }

    /// Remove the background, flatten onto white and crop the margins
    pub async fn remove_background_and_white_crop(&self, image: DynamicImage) -> Result<RgbImage> {
        let remover = self.remover()?;

        let image = match self.options.max_source_dim {
            Some(max_dim) => cap_size(image, max_dim),
            None => image,
        };
        let cut = remover.remove_background(image.to_rgba8()).await?;

        let tolerance = self.options.tolerance;
        let cropped = tokio::task::spawn_blocking(move || {
            crop_non_white(composite_on_white(&cut), tolerance)
        })
        .await?;

        debug!(
            "Background removed, cropped to {}x{}",
            cropped.width(),
            cropped.height()
        );
        Ok(cropped)
    }

    /// Full pipeline from an image file to the model input tensor
    pub async fn preprocess_path(&self, path: &Path) -> Result<PixelTensor> {
        self.remover()?;

        let image = decode(path).await?;
        let cropped = self.remove_background_and_white_crop(image).await?;

        let PreprocessOptions { width, height, .. } = self.options;
        tokio::task::spawn_blocking(move || to_tensor(&cropped, width, height)).await?
    }

    /// Background-remove and crop `input`, saving the result as JPEG.
    /// Returns the saved image's dimensions.
    pub async fn segment_file(&self, input: &Path, output: &Path) -> Result<(u32, u32)> {
        self.remover()?;

        let image = decode(input).await?;
        let cropped = self.remove_background_and_white_crop(image).await?;
        let dimensions = cropped.dimensions();

        let output = output.to_path_buf();
        tokio::task::spawn_blocking(move || save_jpeg(&cropped, &output, JPEG_QUALITY)).await??;
        Ok(dimensions)
    }
}
