//! Foundational primitives for skeleton graph extraction.
//!
//! ## Coordinate Spaces
//! Traversal works on integer [`GridPoint`]s addressed as `(row, col)`.
//! Output positions are [`Point2f`] values with `x = col` and `y = row`;
//! [`GridPoint::to_point2f`] is the only place this swap happens.
//!
//! ## Masks
//! A [`PixelMask`] is an owned `Image<bool>` where `true` marks a skeleton
//! pixel. Borrowed [`ImageView`]s use element stride and may cover padded
//! buffers; [`mask_from_u8`] copies such a view into a contiguous mask.
//!
//! ## Neighborhood
//! [`NEIGHBORS_8`] lists the 8-neighborhood in a fixed priority order
//! together with each step's arc-length cost (1 orthogonal, sqrt(2)
//! diagonal).

mod error;
mod geom;
mod image;
mod mask;

pub use error::Error;
pub use geom::{GridPoint, NEIGHBORS_8, NeighborStep, Point2f};
pub use image::{Image, ImageView, PixelMask};
pub use mask::{MaskPolarity, mask_from_u8};
