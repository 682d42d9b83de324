//! Preprocessing pipeline against image files on disk

use image::{Rgb, RgbImage};
use scls_pre::batch::{collect_images, segment_dir};
use scls_pre::bridge::CHANNEL_NAME;
use scls_pre::{
    ImagePreprocessor, MethodCall, MethodResult, PassthroughRemover, PreprocessBridge,
    PreprocessError, PreprocessOptions,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const BLOCK: Rgb<u8> = Rgb([200, 30, 60]);

/// 40x30 white canvas with a 10x6 colored block at (12, 8)
fn write_block_png(path: &Path) {
    let mut image = RgbImage::from_pixel(40, 30, Rgb([255, 255, 255]));
    for y in 8..14 {
        for x in 12..22 {
            image.put_pixel(x, y, BLOCK);
        }
    }
    image.save(path).unwrap();
}

fn small_options() -> PreprocessOptions {
    PreprocessOptions {
        width: 5,
        height: 3,
        ..PreprocessOptions::default()
    }
}

fn bridge(options: PreprocessOptions) -> PreprocessBridge {
    PreprocessBridge::new(Arc::new(ImagePreprocessor::with_remover(
        options,
        Arc::new(PassthroughRemover),
    )))
}

#[tokio::test]
async fn preprocess_crops_to_block_and_resizes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("back.png");
    write_block_png(&path);

    let call = MethodCall::new("preprocess").with_argument("imagePath", path.to_str().unwrap());
    let tensor = match bridge(small_options()).handle(&call).await {
        MethodResult::Success { value } => value,
        other => panic!("unexpected result: {:?}", other),
    };

    assert_eq!(tensor.len(), 1);
    assert_eq!(tensor[0].len(), 3);
    assert_eq!(tensor[0][0].len(), 5);

    // Cropped to the uniform block, so no white survives the resize
    for pixel in tensor[0].iter().flatten() {
        assert_eq!(pixel, &vec![200.0, 30.0, 60.0]);
    }
}

#[tokio::test]
async fn all_white_image_keeps_full_frame() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.png");
    RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))
        .save(&path)
        .unwrap();

    let preprocessor =
        ImagePreprocessor::with_remover(small_options(), Arc::new(PassthroughRemover));
    let image = image::open(&path).unwrap();
    let cropped = preprocessor
        .remove_background_and_white_crop(image)
        .await
        .unwrap();
    assert_eq!(cropped.dimensions(), (8, 8));
}

#[tokio::test]
async fn undecodable_file_reports_preprocessing_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();

    let call = MethodCall::new("preprocess").with_argument("imagePath", path.to_str().unwrap());
    match bridge(small_options()).handle(&call).await {
        MethodResult::Error { code, message } => {
            assert_eq!(code, "PreprocessingError");
            assert!(message.starts_with("Cannot decode image"), "{}", message);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn uninitialized_preprocessor_rejects_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("back.png");
    write_block_png(&path);

    let preprocessor = ImagePreprocessor::new(small_options());
    assert!(!preprocessor.is_initialized());
    let err = preprocessor.preprocess_path(&path).await.unwrap_err();
    assert!(matches!(err, PreprocessError::NotInitialized));
}

#[tokio::test]
async fn segment_directory_isolates_failures() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_block_png(&input.path().join("a.png"));
    write_block_png(&input.path().join("b.PNG"));
    std::fs::write(input.path().join("c.jpg"), b"garbage").unwrap();
    std::fs::write(input.path().join("notes.txt"), b"skip me").unwrap();

    assert_eq!(collect_images(input.path()).unwrap().len(), 3);

    let preprocessor = Arc::new(ImagePreprocessor::with_remover(
        PreprocessOptions::default(),
        Arc::new(PassthroughRemover),
    ));
    let report = segment_dir(preprocessor, input.path(), output.path(), 2)
        .await
        .unwrap();

    assert_eq!(report.processed.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].path.ends_with("c.jpg"));

    let saved = image::open(output.path().join("a.png.jpg")).unwrap();
    assert_eq!((saved.width(), saved.height()), (10, 6));
    assert!(output.path().join("b.PNG.jpg").exists());
    assert!(!output.path().join("c.jpg").exists());
}

#[tokio::test]
async fn same_stem_sources_get_separate_outputs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_block_png(&input.path().join("x.png"));

    // Solid colour edge to edge, so JPEG noise cannot change the crop
    RgbImage::from_pixel(18, 4, BLOCK)
        .save(input.path().join("x.jpg"))
        .unwrap();

    let preprocessor = Arc::new(ImagePreprocessor::with_remover(
        PreprocessOptions::default(),
        Arc::new(PassthroughRemover),
    ));
    let report = segment_dir(preprocessor, input.path(), output.path(), 4)
        .await
        .unwrap();

    assert_eq!(report.processed.len(), 2);
    assert!(report.failed.is_empty());

    let from_png = image::open(output.path().join("x.png.jpg")).unwrap();
    let from_jpg = image::open(output.path().join("x.jpg")).unwrap();
    assert_eq!((from_png.width(), from_png.height()), (10, 6));
    assert_eq!((from_jpg.width(), from_jpg.height()), (18, 4));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 2);
}

#[test]
fn channel_name_is_stable() {
    assert_eq!(CHANNEL_NAME, "ai.nextvine.scoliosis/angle");
}
