//! Forbidden-term compliance: the built-in dictionary and the scanning engine.

pub mod dictionary;
pub mod engine;

pub use dictionary::ForbiddenDictionary;
pub use engine::ForbiddenTermEngine;
