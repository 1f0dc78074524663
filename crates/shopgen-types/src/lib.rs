//! Shared domain types for shopgen.
//!
//! This crate holds the types used across the content-generation pipeline:
//! skills, provider requests, generation results, knowledge documents,
//! compliance matches, quality scores, configuration and error enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod compliance;
pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod knowledge;
pub mod llm;
pub mod quality;
pub mod skill;
