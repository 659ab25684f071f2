//! Fetches the sentence-embedding model on first use.

use crate::model::EmbeddingConfig;
use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Make sure the model and tokenizer files exist, downloading them if allowed.
///
/// Fails when a file is missing and downloading is disabled or unreachable.
pub fn ensure_models_downloaded(config: &EmbeddingConfig) -> Result<()> {
    let missing: Vec<(&Path, &str)> = [
        (config.model_path.as_path(), MODEL_URL),
        (config.tokenizer_path.as_path(), TOKENIZER_URL),
    ]
    .into_iter()
    .filter(|(path, _)| !path.exists())
    .collect();

    if missing.is_empty() {
        return Ok(());
    }

    if !config.download {
        bail!(
            "Embedding model files missing and downloads are disabled: {:?}",
            missing.iter().map(|(p, _)| p).collect::<Vec<_>>()
        );
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()?;

    for (path, url) in missing {
        download_file(&client, url, path)?;
    }

    Ok(())
}

fn download_file(client: &reqwest::blocking::Client, url: &str, dest: &Path) -> Result<()> {
    info!("Downloading {} to {:?}", url, dest);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create model directory {:?}", parent))?;
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Failed to download {}", url))?
        .bytes()?;

    // Written beside the destination, then renamed into place.
    let partial = dest.with_extension("partial");
    let mut file = fs::File::create(&partial)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    fs::rename(&partial, dest)?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(())
}
