//! Lazily loaded, optional embedding capability.

use crate::error::EmbeddingError;
use crate::model::{EmbeddingConfig, EmbeddingModel, create_embedding_model};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, warn};

/// Produces the embedding model. Called at most once per provider.
pub type ModelLoader = Box<dyn Fn() -> anyhow::Result<Box<dyn EmbeddingModel>> + Send + Sync>;

/// Wraps an embedding model that may not be loadable in this environment.
///
/// The model is loaded on first use. If loading fails the provider reports
/// itself unavailable for the rest of its lifetime; the load is never retried.
pub struct EmbeddingProvider {
    loader: ModelLoader,
    model: OnceLock<Option<Box<dyn EmbeddingModel>>>,
}

impl EmbeddingProvider {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            loader,
            model: OnceLock::new(),
        }
    }

    /// Provider backed by [`create_embedding_model`].
    pub fn from_config(config: EmbeddingConfig) -> Self {
        Self::new(Box::new(move || create_embedding_model(Some(config.clone()))))
    }

    /// Provider that never has a model.
    pub fn disabled() -> Self {
        Self::new(Box::new(|| -> anyhow::Result<Box<dyn EmbeddingModel>> {
            anyhow::bail!("vector search disabled by configuration")
        }))
    }

    /// Provider around an already constructed model.
    pub fn with_model(model: Box<dyn EmbeddingModel>) -> Self {
        let provider = Self::disabled();
        let _ = provider.model.set(Some(model));
        provider
    }

    fn model(&self) -> Option<&dyn EmbeddingModel> {
        self.model
            .get_or_init(|| {
                let start = Instant::now();
                // Native runtime setup can panic; treat that like a failed load.
                match panic::catch_unwind(AssertUnwindSafe(|| (self.loader)())) {
                    Ok(Ok(model)) => {
                        info!(
                            dim = model.dimension(),
                            time_ms = start.elapsed().as_millis() as u64,
                            "Embedding model loaded"
                        );
                        Some(model)
                    }
                    Ok(Err(e)) => {
                        warn!("Embedding model unavailable, vector search disabled: {:#}", e);
                        None
                    }
                    Err(_) => {
                        warn!("Embedding model loader panicked, vector search disabled");
                        None
                    }
                }
            })
            .as_deref()
    }

    /// Whether a model is usable, loading it on first call.
    pub fn is_available(&self) -> bool {
        self.model().is_some()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.model().map(|m| m.dimension())
    }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = self.model().ok_or(EmbeddingError::Unavailable)?;
        let vector = model
            .embed(text)
            .map_err(|e| EmbeddingError::Inference(format!("{:#}", e)))?;
        check_dimension(model.dimension(), &vector)?;
        Ok(vector)
    }

    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.model().ok_or(EmbeddingError::Unavailable)?;
        let vectors = model
            .embed_batch(texts)
            .map_err(|e| EmbeddingError::Inference(format!("{:#}", e)))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Inference(format!(
                "model returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        for vector in &vectors {
            check_dimension(model.dimension(), vector)?;
        }
        Ok(vectors)
    }
}

fn check_dimension(expected: usize, vector: &[f32]) -> Result<(), EmbeddingError> {
    if vector.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ConstantModel {
        dim: usize,
    }

    impl EmbeddingModel for ConstantModel {
        fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            if text == "fail" {
                anyhow::bail!("inference error");
            }
            Ok(vec![1.0; self.dim])
        }

        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            texts.iter().map(|t| self.embed(t)).collect()
        }

        fn dimension(&self) -> usize {
            self.dim
        }
    }

    struct WrongSizeModel;

    impl EmbeddingModel for WrongSizeModel {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![0.0; 2])
        }

        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 2]).collect())
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    #[test]
    fn test_lazy_load_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let provider = EmbeddingProvider::new(Box::new(
            move || -> anyhow::Result<Box<dyn EmbeddingModel>> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ConstantModel { dim: 4 }))
            },
        ));

        assert_eq!(loads.load(Ordering::SeqCst), 0);

        assert_eq!(provider.embed("hello").unwrap().len(), 4);
        assert_eq!(provider.embed("again").unwrap().len(), 4);
        assert!(provider.is_available());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_permanent() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let provider = EmbeddingProvider::new(Box::new(
            move || -> anyhow::Result<Box<dyn EmbeddingModel>> {
                counter.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("no runtime")
            },
        ));

        assert!(!provider.is_available());
        assert!(matches!(provider.embed("x"), Err(EmbeddingError::Unavailable)));
        assert!(matches!(
            provider.embed_batch(&["x".to_string()]),
            Err(EmbeddingError::Unavailable)
        ));
        assert!(!provider.is_available());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_loader_is_unavailable_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let provider = EmbeddingProvider::new(Box::new(
            move || -> anyhow::Result<Box<dyn EmbeddingModel>> {
                counter.fetch_add(1, Ordering::SeqCst);
                panic!("onnxruntime shared library not found")
            },
        ));

        assert!(!provider.is_available());
        assert!(matches!(provider.embed("x"), Err(EmbeddingError::Unavailable)));
        assert_eq!(provider.dimension(), None);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_provider() {
        let provider = EmbeddingProvider::disabled();
        assert!(!provider.is_available());
        assert_eq!(provider.dimension(), None);
    }

    #[test]
    fn test_with_model_is_preloaded() {
        let provider = EmbeddingProvider::with_model(Box::new(ConstantModel { dim: 3 }));
        assert!(provider.is_available());
        assert_eq!(provider.dimension(), Some(3));
    }

    #[test]
    fn test_inference_error_is_reported() {
        let provider = EmbeddingProvider::with_model(Box::new(ConstantModel { dim: 3 }));
        assert!(matches!(provider.embed("fail"), Err(EmbeddingError::Inference(_))));
        // The provider itself stays available
        assert!(provider.embed("ok").is_ok());
    }

    #[test]
    fn test_dimension_mismatch() {
        let provider = EmbeddingProvider::with_model(Box::new(WrongSizeModel));
        assert!(matches!(
            provider.embed("x"),
            Err(EmbeddingError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        assert!(provider.embed_batch(&["x".to_string()]).is_err());
    }
}
