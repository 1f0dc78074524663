//! Skill resolution and prompt assembly.
//!
//! Maps a logical skill/feature id to a concrete model configuration and
//! builds the system prompt for a request. The domain types live in
//! `shopgen-types::skill`.

mod catalog;
pub mod prompt_injector;
pub mod resolver;

pub use resolver::SkillResolver;
