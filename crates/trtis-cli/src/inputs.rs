use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use trtis_core::ModelConfig;

/// A regular file is its own input; a directory contributes its files in
/// name order.
pub async fn discover_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("couldn't stat input {}", path.display()))?;

    if meta.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !meta.is_dir() {
        bail!("input {} is neither a file nor a directory", path.display());
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(path)
        .await
        .with_context(|| format!("couldn't read input directory {}", path.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    if files.is_empty() {
        bail!("input directory {} has no files", path.display());
    }
    Ok(files)
}

#[derive(Debug, PartialEq, Eq)]
pub struct PlannedBatch {
    pub files: Vec<PathBuf>,
    /// Size of the single input payload carrying this batch.
    pub batch_byte_size: usize,
}

/// Groups inputs into requests of at most `batch_size`; the last one may be short.
pub fn plan_batches(config: &ModelConfig, files: &[PathBuf], batch_size: u32) -> Vec<PlannedBatch> {
    let per_instance = config.input_instance_bytes();
    files
        .chunks(batch_size.max(1) as usize)
        .map(|chunk| PlannedBatch {
            files: chunk.to_vec(),
            batch_byte_size: per_instance * chunk.len(),
        })
        .collect()
}
