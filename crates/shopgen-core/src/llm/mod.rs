//! Provider abstractions for shopgen.
//!
//! - `ContentProvider`: RPITIT trait for concrete vendor adapters
//! - `BoxContentProvider`: object-safe wrapper for dynamic dispatch
//! - `ProviderRegistry`: kind-indexed lookup used by the dispatcher

pub mod box_provider;
pub mod provider;
pub mod registry;
