//! # scls-pre
//!
//! Image preprocessing for the scoliscan mobile app: background removal,
//! white cropping and conversion to the model's input tensor, served
//! through a method-call bridge. Also holds the batch segmenter and the
//! Cobb angle curve-pattern classifier.

pub mod batch;
pub mod bridge;
pub mod curves;
pub mod error;
pub mod preprocess;
pub mod remover;

pub use bridge::{MethodCall, MethodResult, PreprocessBridge};
pub use curves::{
    classify, classify_frames, mean_angles, Classification, CobbAngles, CurvePattern,
};
pub use error::{PreprocessError, Result};
pub use preprocess::{ImagePreprocessor, PixelTensor, PreprocessOptions};
pub use remover::{BackgroundRemover, PassthroughRemover};
