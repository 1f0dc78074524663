//! Content-generation pipeline logic for shopgen.
//!
//! Skill resolution, the provider abstraction, the generation dispatcher,
//! knowledge retrieval, forbidden-term compliance and quality scoring.
//!
//! This crate depends only on `shopgen-types` and async utilities. Concrete
//! vendor adapters and embedders live in `shopgen-infra`.

pub mod compliance;
pub mod dispatch;
pub mod knowledge;
pub mod llm;
pub mod quality;
pub mod service;
pub mod skill;
