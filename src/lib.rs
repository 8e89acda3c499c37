//! matforge - matrix substrate for a neural-network toolkit
//!
//! Host-side matrix containers plus the routine that stages a host matrix
//! into accelerator memory. Real AMD GPUs are reached through HIP with the
//! `rocm` feature; without it a host-simulated device stands in.

#![allow(clippy::too_many_arguments)] // Rank-5 constructors take every extent
#![allow(clippy::len_without_is_empty)]

pub mod backend;
pub mod error;
pub mod layers;
pub mod logging;
pub mod matrix;
pub mod staging;

pub use backend::{DeviceRuntime, DeviceStatus, HostRuntime};
#[cfg(feature = "rocm")]
pub use backend::HipRuntime;
pub use error::{ErrorCategory, ForgeResult, MatForgeError};
pub use layers::{IdRegistry, LayerSet};
pub use matrix::{render, Mat2D, Mat3D, Mat4D, Mat5D, MatrixChain, MatrixIndex, RenderOptions};
pub use staging::{stage, stage_chain, DeviceMatrix, StageOptions};
