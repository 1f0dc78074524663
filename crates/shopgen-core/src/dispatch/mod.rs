//! Generation dispatch: the fallback state machine and its last-resort
//! simulation templates.

pub mod dispatcher;
pub mod simulation;

pub use dispatcher::{Dispatcher, Stage};
