//! Text embedding for candidate retrieval
//!
//! Claim labels and evidence text are embedded into vectors so the
//! synthesis engine can find plausibly-matching claims by cosine
//! similarity. A local model keeps retrieval off the network.
//!
//! The hash-based [`MockEmbeddingModel`] produces deterministic,
//! normalized vectors. It carries no semantics but exercises the full
//! retrieval path in tests; a real ONNX model slots in behind the same
//! trait.
//!
//! # Examples
//!
//! ```rust
//! use dossier_store::embedding::{EmbeddingModel, MockEmbeddingModel};
//!
//! let model = MockEmbeddingModel::new(384);
//! let a = model.embed("Rust").unwrap();
//! let b = model.embed("Rust").unwrap();
//! assert_eq!(a, b);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Trait for embedding models
pub trait EmbeddingModel {
    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimension of the vectors this model produces
    fn dimension(&self) -> usize;
}

/// Deterministic hash-based embedding model
///
/// Hashes the text with one seed per dimension and normalizes to unit
/// length. Identical text always maps to the identical vector, so exact
/// label re-submissions score similarity 1.0 in the index.
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl MockEmbeddingModel {
    /// Create a model producing vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let hash_value = hasher.finish();

        // Map to [-1, 1]
        let scaled = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        scaled as f32
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding: Vec<f32> = (0..self.dimension)
            .map(|i| Self::hash_with_seed(text, i as u64))
            .collect();

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity between two vectors, in [-1, 1]
///
/// Returns 0.0 when either vector has zero magnitude.
///
/// # Panics
///
/// Panics if the vectors have different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_deterministic() {
        let model = MockEmbeddingModel::new(384);
        let a = model.embed("Kubernetes").unwrap();
        let b = model.embed("Kubernetes").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_embedding_dimension() {
        let model = MockEmbeddingModel::new(128);
        let embedding = model.embed("anything").unwrap();
        assert_eq!(embedding.len(), 128);
        assert_eq!(model.dimension(), 128);
    }

    #[test]
    fn test_embedding_normalized() {
        let model = MockEmbeddingModel::new(384);
        let embedding = model.embed("Python programming").unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_different_texts_differ() {
        let model = MockEmbeddingModel::new(384);
        let a = model.embed("AWS Lambda").unwrap();
        let b = model.embed("Amazon EC2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_text_rejected() {
        let model = MockEmbeddingModel::new(384);
        assert!(model.embed("").is_err());
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![0.6, 0.8, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
