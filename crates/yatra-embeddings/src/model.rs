use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
#[cfg(feature = "onnx")]
use tracing::info;

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";
const DEFAULT_MODEL_DIR: &str = "models/all-MiniLM-L6-v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub max_length: usize,
    pub batch_size: usize,
    /// Fetch the model files when they are missing locally.
    pub download: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::in_dir(PathBuf::from(DEFAULT_MODEL_DIR))
    }
}

impl EmbeddingConfig {
    /// Config pointing at `model.onnx` and `tokenizer.json` inside `dir`.
    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            model_path: dir.join(MODEL_FILE),
            tokenizer_path: dir.join(TOKENIZER_FILE),
            max_length: 256,
            batch_size: 32,
            download: true,
        }
    }

    /// Read `YATRA_MODEL_DIR` and `YATRA_MODEL_DOWNLOAD`.
    ///
    /// Without `YATRA_MODEL_DIR` the model lives in the user cache directory
    /// when it can be determined, else under `models/`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EmbeddingConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = lookup("YATRA_MODEL_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_model_dir);

        let download = lookup("YATRA_MODEL_DOWNLOAD")
            .map(|v| v.trim() != "0" && !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            download,
            ..Self::in_dir(dir)
        }
    }
}

#[cfg(feature = "onnx")]
fn default_model_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("yatra").join("all-MiniLM-L6-v2"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR))
}

#[cfg(not(feature = "onnx"))]
fn default_model_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_DIR)
}

/// Trait for embedding models
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn dimension(&self) -> usize;
}

#[cfg(feature = "onnx")]
pub mod onnx {
    use super::*;
    use crate::pooling::mean_pool;
    use anyhow::{Context, anyhow};
    use ndarray::ArrayView2;
    use ort::session::Session;
    use ort::session::builder::GraphOptimizationLevel;
    use ort::value::Tensor;
    use std::sync::Mutex;
    use tokenizers::Tokenizer;

    pub struct OnnxEmbeddingModel {
        // Inference needs exclusive access to the session.
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        config: EmbeddingConfig,
    }

    fn ort_error(e: impl std::fmt::Display) -> anyhow::Error {
        anyhow!("ONNX runtime error: {}", e)
    }

    impl OnnxEmbeddingModel {
        pub fn load(config: EmbeddingConfig) -> Result<Self> {
            info!("Loading ONNX model from {:?}", config.model_path);

            let session = Session::builder()
                .map_err(ort_error)?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(ort_error)?
                .with_intra_threads(4)
                .map_err(ort_error)?
                .commit_from_file(&config.model_path)
                .map_err(ort_error)?;

            let tokenizer = Tokenizer::from_file(&config.tokenizer_path)
                .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;

            Ok(Self {
                session: Mutex::new(session),
                tokenizer,
                config,
            })
        }

        fn tokenize(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>)> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

            let max_len = self.config.max_length;
            let input_ids: Vec<i64> = encoding
                .get_ids()
                .iter()
                .take(max_len)
                .map(|&x| x as i64)
                .collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .take(max_len)
                .map(|&x| x as i64)
                .collect();

            Ok((input_ids, attention_mask))
        }
    }

    impl EmbeddingModel for OnnxEmbeddingModel {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let (input_ids, attention_mask) = self.tokenize(text)?;
            let seq_len = input_ids.len();

            let ids_tensor = Tensor::from_array(([1usize, seq_len], input_ids)).map_err(ort_error)?;
            let mask_tensor =
                Tensor::from_array(([1usize, seq_len], attention_mask.clone())).map_err(ort_error)?;
            let type_tensor =
                Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len])).map_err(ort_error)?;

            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow!("ONNX session lock poisoned: {}", e))?;
            let outputs = session
                .run(ort::inputs![
                    "input_ids" => ids_tensor,
                    "attention_mask" => mask_tensor,
                    "token_type_ids" => type_tensor,
                ])
                .map_err(ort_error)?;

            let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(ort_error)?;
            let hidden_size = *shape.last().context("Model output has no dimensions")? as usize;
            let token_embeddings = ArrayView2::from_shape((seq_len, hidden_size), &data[..seq_len * hidden_size])?;

            Ok(mean_pool(token_embeddings, &attention_mask))
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            // One forward pass per text; the session is not shared across calls anyway.
            texts.iter().map(|text| self.embed(text)).collect()
        }

        fn dimension(&self) -> usize {
            crate::EMBEDDING_DIM
        }
    }
}

/// Create an embedding model based on available features.
///
/// Fails when the `onnx` feature is off or the model cannot be loaded; the
/// caller decides what "no model" means.
pub fn create_embedding_model(
    #[allow(unused_variables)] config: Option<EmbeddingConfig>,
) -> Result<Box<dyn EmbeddingModel>> {
    #[cfg(feature = "onnx")]
    {
        let config = config.unwrap_or_else(EmbeddingConfig::from_env);
        crate::download::ensure_models_downloaded(&config)?;
        info!("Using ONNX embedding model");
        return Ok(Box::new(onnx::OnnxEmbeddingModel::load(config)?));
    }

    #[cfg(not(feature = "onnx"))]
    anyhow::bail!("built without the `onnx` feature, no embedding model available");
}
