//! Host method-call bridge
//!
//! The host sends `{method, arguments}`; the only method served is
//! `preprocess` with an `imagePath` string argument. Failures come back as
//! `PreprocessingError` with the error message, anything else as
//! not-implemented.

use crate::error::{PreprocessError, PREPROCESSING_ERROR};
use crate::preprocess::{ImagePreprocessor, PixelTensor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

/// Channel name the host registers the bridge under
pub const CHANNEL_NAME: &str = "ai.nextvine.scoliosis/angle";

pub const METHOD_PREPROCESS: &str = "preprocess";
pub const ARG_IMAGE_PATH: &str = "imagePath";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn argument_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
    Success { value: PixelTensor },
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodResult {
    pub fn from_error(err: &PreprocessError) -> Self {
        MethodResult::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success { .. })
    }
}

pub struct PreprocessBridge {
    preprocessor: Arc<ImagePreprocessor>,
}

impl PreprocessBridge {
    pub fn new(preprocessor: Arc<ImagePreprocessor>) -> Self {
        Self { preprocessor }
    }

    pub async fn handle(&self, call: &MethodCall) -> MethodResult {
        debug!("Method call: {}", call.method);

        if call.method != METHOD_PREPROCESS {
            return MethodResult::NotImplemented;
        }

        let result = match call.argument_str(ARG_IMAGE_PATH) {
            Some(path) => self.preprocessor.preprocess_path(Path::new(path)).await,
            None => Err(PreprocessError::MissingArgument(ARG_IMAGE_PATH)),
        };

        match result {
            Ok(value) => MethodResult::Success { value },
            Err(e) => {
                error!("{}: {}", PREPROCESSING_ERROR, e);
                MethodResult::from_error(&e)
            }
        }
    }
}
