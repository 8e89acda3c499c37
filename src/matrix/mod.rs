//! Host-side matrix data model
//!
//! - [`Mat2D`]: rank-2 row-major matrix built from a flat buffer
//! - [`MatrixChain`]: ordered grouping of rank-2 matrices
//! - [`Mat3D`], [`Mat4D`], [`Mat5D`]: passive higher-rank containers
//! - [`render`]: text listing used for diagnostics

pub mod chain;
pub mod higher;
pub mod mat2d;
pub mod render;

pub use chain::{MatrixChain, MatrixIndex};
pub use higher::{Mat3D, Mat4D, Mat5D};
pub use mat2d::Mat2D;
pub use render::{render, RenderOptions};
