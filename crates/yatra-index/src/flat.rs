//! Flat (brute-force) L2 index.
//!
//! Vectors are stored contiguously in insertion order, so a vector's position
//! is the id of the place it was built from.

use crate::error::IndexError;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};
use yatra_corpus::PlaceRecord;
use yatra_embeddings::{EmbeddingError, EmbeddingProvider};

/// Places embedded per model call during [`VectorIndex::build`].
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Progress is logged every this many places.
const PROGRESS_EVERY: usize = 100;

/// Convert an L2 distance into a similarity score in (0, 1].
pub fn similarity_from_distance(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexStats {
    pub size: usize,
    pub dimension: usize,
}

#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }
        Ok(Self {
            dimension,
            data: Vec::new(),
        })
    }

    /// Embed every record's search text, in corpus order, into a new index.
    ///
    /// Either every record is indexed or an error is returned; a partially
    /// built index is never handed out.
    pub fn build(
        records: &[PlaceRecord],
        provider: &EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self, IndexError> {
        let start = Instant::now();
        let dimension = provider.dimension().ok_or(IndexError::Embedding {
            position: 0,
            source: EmbeddingError::Unavailable,
        })?;
        let mut index = Self::new(dimension)?;
        index.data.reserve(records.len() * dimension);

        for batch in records.chunks(batch_size.max(1)) {
            let texts: Vec<String> = batch.iter().map(|r| r.search_text.clone()).collect();
            let vectors = provider
                .embed_batch(&texts)
                .map_err(|source| IndexError::Embedding {
                    position: index.len(),
                    source,
                })?;

            for vector in &vectors {
                index.add(vector)?;
                if index.len() % PROGRESS_EVERY == 0 {
                    info!("Embedded {}/{} places...", index.len(), records.len());
                }
            }
        }

        info!(
            size = index.len(),
            dimension,
            time_ms = start.elapsed().as_millis() as u64,
            "Vector index built"
        );
        Ok(index)
    }

    /// Append a vector and return its position.
    pub fn add(&mut self, vector: &[f32]) -> Result<usize, IndexError> {
        self.check_dimension(vector)?;
        let position = self.len();
        self.data.extend_from_slice(vector);
        Ok(position)
    }

    /// The `k` stored vectors nearest to `vector` by Euclidean distance, as
    /// `(position, distance)` ascending by distance. Equal distances keep
    /// insertion order.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        self.check_dimension(vector)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, stored)| (position, l2_distance(stored, vector)))
            .collect();

        // Stable sort, so ties stay in insertion order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        debug!(k, returned = scored.len(), "Vector index query");
        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            size: self.len(),
            dimension: self.dimension,
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
