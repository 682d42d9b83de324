//! Directory segmentation
//!
//! Runs background removal and white cropping over every image in a folder,
//! a few files at a time, writing JPEGs named after the source file. One
//! bad file does not stop the batch.

use crate::error::Result;
use crate::preprocess::ImagePreprocessor;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use walkdir::WalkDir;

pub const DEFAULT_WORKERS: usize = 4;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentReport {
    pub processed: Vec<PathBuf>,
    pub failed: Vec<SegmentFailure>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by path
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false)
}

/// Output path for `input` inside `output_dir`
///
/// JPEG sources keep their file name; anything else gets `.jpg` appended
/// to the full name, so `x.png` and `x.jpg` never share an output.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_name().unwrap_or(input.as_os_str()).to_os_string();
    if !is_jpeg(input) {
        name.push(".jpg");
    }
    output_dir.join(name)
}

/// Pair every input with its output; inputs whose output is already taken
/// (compared case-insensitively) become failures
fn plan_outputs(
    files: Vec<PathBuf>,
    output_dir: &Path,
) -> (Vec<(PathBuf, PathBuf)>, Vec<SegmentFailure>) {
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let mut jobs = Vec::with_capacity(files.len());
    let mut conflicts = Vec::new();

    for input in files {
        let output = output_path(&input, output_dir);
        let key = output.to_string_lossy().to_lowercase();
        match claimed.get(&key) {
            Some(owner) => conflicts.push(SegmentFailure {
                message: format!(
                    "Output {} already written for {}",
                    output.display(),
                    owner.display()
                ),
                path: input,
            }),
            None => {
                claimed.insert(key, input.clone());
                jobs.push((input, output));
            }
        }
    }
    (jobs, conflicts)
}

pub async fn segment_dir(
    preprocessor: Arc<ImagePreprocessor>,
    input_dir: &Path,
    output_dir: &Path,
    workers: usize,
) -> Result<SegmentReport> {
    tokio::fs::create_dir_all(output_dir).await?;
    let files = collect_images(input_dir)?;
    info!(
        "Segmenting {} images from {} with {} workers",
        files.len(),
        input_dir.display(),
        workers.max(1)
    );

    let (jobs, conflicts) = plan_outputs(files, output_dir);

    let results: Vec<_> = stream::iter(jobs)
        .map(|(input, output)| {
            let preprocessor = Arc::clone(&preprocessor);
            async move {
                let result = preprocessor.segment_file(&input, &output).await;
                (input, result)
            }
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let mut report = SegmentReport::default();
    for conflict in conflicts {
        warn!("Skipped {}: {}", conflict.path.display(), conflict.message);
        report.failed.push(conflict);
    }
    for (path, result) in results {
        match result {
            Ok((width, height)) => {
                info!("Saved {} ({}x{})", path.display(), width, height);
                report.processed.push(path);
            }
            Err(e) => {
                warn!("Failed {}: {}", path.display(), e);
                report.failed.push(SegmentFailure {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }
    report.processed.sort();
    report.failed.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(report)
}
