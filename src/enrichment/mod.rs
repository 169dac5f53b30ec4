//! Data enrichment: derived indicators, trailing trend and yearly aggregates.

pub mod enricher;
pub mod error;
pub mod indicators;
pub mod summary;
pub mod trend;
