//! Umbrella crate for the skeleton-graph workspace.
//!
//! Re-exports the raster primitives of `sg-core` and the extraction
//! pipeline of `sg-skeleton`.

pub use sg_core::*;
pub use sg_skeleton::*;
