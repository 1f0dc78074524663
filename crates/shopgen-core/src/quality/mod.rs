//! Content quality scoring.

pub mod scorer;

pub use scorer::QualityScorer;
