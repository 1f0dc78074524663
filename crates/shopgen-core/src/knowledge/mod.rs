//! Per-shop knowledge base: chunking, embedding and similarity retrieval.
//!
//! The `Embedder` trait is implemented in shopgen-infra; everything else
//! here is backend-agnostic and keeps its state in memory.

pub mod box_embedder;
pub mod chunker;
pub mod context;
pub mod embedder;
pub mod engine;
pub mod store;

pub use engine::{RetrievalEngine, UploadRequest};
