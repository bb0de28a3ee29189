//! Text embedding backends
//!
//! The recommender only depends on the `Embedder` trait. `HashingEmbedder` needs no model
//! files; the `fastembed` feature adds sentence-transformer embeddings.

use crate::error::AppResult;

/// Produces L2-normalized vectors, one per input text
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()])?;
        vectors.pop().ok_or_else(|| {
            crate::error::AppError::Embedding("Embedder returned no vector".to_string())
        })
    }

    fn name(&self) -> &'static str;
}

/// Scales `vector` to unit length; zero vectors are left untouched
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity of two normalized vectors
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub const DEFAULT_HASHING_DIMENSION: usize = 512;

/// Bag-of-words embedder: token counts hashed into a fixed number of buckets
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        // FNV-1a, stable across runs and platforms
        let hash = token.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        });
        (hash % self.dimension as u64) as usize
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '#' || c == '+'))
            .filter(|t| !t.is_empty());
        for token in tokens {
            vector[self.bucket(token)] += 1.0;
        }
        normalize(&mut vector);
        vector
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn name(&self) -> &'static str {
        "hashing"
    }
}

#[cfg(feature = "fastembed")]
pub use self::fast::FastEmbedder;

#[cfg(feature = "fastembed")]
mod fast {
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{normalize, Embedder};
    use crate::error::{AppError, AppResult};

    /// Sentence-transformer embeddings via fastembed (ONNX runtime)
    pub struct FastEmbedder {
        model: TextEmbedding,
        dimension: usize,
    }

    impl FastEmbedder {
        pub fn new(model_name: &str) -> AppResult<Self> {
            let (model, dimension) = match model_name.to_lowercase().as_str() {
                "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
                    (EmbeddingModel::AllMiniLML6V2, 384)
                }
                "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
                other => {
                    return Err(AppError::Embedding(format!(
                        "Unsupported embedding model: {}",
                        other
                    )))
                }
            };

            tracing::info!(model = %model_name, "Loading embedding model");

            let model = TextEmbedding::try_new(
                InitOptions::new(model).with_show_download_progress(true),
            )
            .map_err(|e| AppError::Embedding(format!("Failed to load model: {}", e)))?;

            Ok(Self { model, dimension })
        }
    }

    impl Embedder for FastEmbedder {
        fn dimension(&self) -> usize {
            self.dimension
        }

        fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            let mut vectors = self
                .model
                .embed(texts.to_vec(), None)
                .map_err(|e| AppError::Embedding(e.to_string()))?;
            vectors.iter_mut().for_each(|v| normalize(v));
            Ok(vectors)
        }

        fn name(&self) -> &'static str {
            "fastembed"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut v = vec![0.0; 4];
        normalize(&mut v);
        assert_eq!(v, vec![0.0; 4]);
    }

    #[test]
    fn test_hashing_embedder_identical_texts() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed_one("Java developer").unwrap();
        let b = embedder.embed_one("java DEVELOPER").unwrap();
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-5);
        assert_eq!(a.len(), DEFAULT_HASHING_DIMENSION);
    }

    #[test]
    fn test_hashing_embedder_overlap_ranks_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed_one("python sql analyst").unwrap();
        let close = embedder.embed_one("python and sql test").unwrap();
        let far = embedder.embed_one("leadership personality report").unwrap();
        assert!(cosine(&query, &close) > cosine(&query, &far));
    }

    #[test]
    fn test_empty_text_embeds_to_zero_vector() {
        let embedder = HashingEmbedder::new(8);
        let v = embedder.embed_one("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
