//! Terminal presentation for batch runs

pub mod progress;
pub mod summary;

pub use progress::BatchProgress;
