//! Artifact layout, CSV IO and the processed dataset view.

pub mod artifact;
pub mod error;
pub mod frames;
pub mod processed_frame;
pub mod schema;
