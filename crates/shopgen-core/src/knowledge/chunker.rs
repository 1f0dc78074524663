//! Character-window chunker with overlap.
//!
//! Splitting is delegated to `text-splitter`, which sizes windows in
//! characters and prefers the coarsest semantic boundary that fits
//! (paragraph, then sentence, then word). Trimming is disabled so no source
//! characters are dropped between chunks.
//!
//! Concatenating every chunk's text minus its leading overlap reproduces the
//! source text exactly.

use text_splitter::{Characters, ChunkConfig, TextSplitter};

use shopgen_types::error::ConfigurationError;

/// One window over the source text, before embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub position: usize,
    /// Character offset of the first character.
    pub start: usize,
    /// Leading characters shared with the previous chunk.
    pub overlap: usize,
    pub text: String,
}

/// Splits document text into overlapping windows.
pub struct Chunker {
    splitter: TextSplitter<Characters>,
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// `size` must be positive and strictly larger than `overlap`.
    pub fn new(size: usize, overlap: usize) -> Result<Self, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "retrieval.chunk_size".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if overlap >= size {
            return Err(ConfigurationError::InvalidValue {
                key: "retrieval.chunk_overlap".to_string(),
                reason: format!("must be smaller than chunk_size ({size})"),
            });
        }
        let config = ChunkConfig::new(size)
            .with_overlap(overlap)
            .map_err(|e| ConfigurationError::InvalidValue {
                key: "retrieval.chunk_overlap".to_string(),
                reason: e.to_string(),
            })?
            .with_trim(false);
        Ok(Self {
            splitter: TextSplitter::new(config),
            size,
            overlap,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into chunks. Empty input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut prev_end: usize = 0;
        for piece in self.splitter.chunk_char_indices(text) {
            let len = piece.chunk.chars().count();
            chunks.push(TextChunk {
                position: chunks.len(),
                start: piece.char_offset,
                overlap: prev_end.saturating_sub(piece.char_offset).min(len),
                text: piece.chunk.to_string(),
            });
            prev_end = prev_end.max(piece.char_offset + len);
        }
        chunks
    }
}
