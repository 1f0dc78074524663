//! Infrastructure layer for shopgen.
//!
//! Implements the traits defined in `shopgen-core` against the outside
//! world: HTTP adapters for the model vendors, embedding backends,
//! credential lookup and configuration loading.

pub mod config;
pub mod embedding;
pub mod llm;
pub mod secret;
