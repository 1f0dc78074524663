//! Application services composed from the core engines.

pub mod content;
