//! Deterministic local embedder.
//!
//! Character n-gram feature hashing: every non-whitespace character and
//! every adjacent character pair is hashed with SHA-256 into one of
//! `dimension` buckets with a ±1 sign, and the result is L2-normalized.
//! No model download, no network, identical output on every platform.

use sha2::{Digest, Sha256};

use shopgen_core::knowledge::embedder::Embedder;
use shopgen_types::error::RetrievalError;

const MODEL_NAME: &str = "local-ngram-hash";

pub struct LocalHashEmbedder {
    dimension: usize,
}

impl LocalHashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(head) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    /// Embed one text. Text with no features maps to the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        let chars: Vec<char> = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        let mut buf = [0u8; 8];
        for c in &chars {
            let (i, sign) = self.bucket(c.encode_utf8(&mut buf));
            vector[i] += sign;
        }
        for pair in chars.windows(2) {
            let bigram: String = pair.iter().collect();
            let (i, sign) = self.bucket(&bigram);
            vector[i] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Embedder for LocalHashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
