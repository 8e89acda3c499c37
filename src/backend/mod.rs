//! Accelerator runtimes
//!
//! [`DeviceRuntime`] is the seam between device staging and the memory
//! primitives of an accelerator. [`HostRuntime`] simulates a device in host
//! memory; [`HipRuntime`] (feature `rocm`) talks to an AMD GPU.

pub mod host;
#[cfg(feature = "rocm")]
pub mod hip;
pub mod runtime;
pub mod status;

pub use host::{HostBuffer, HostRuntime, HostRuntimeConfig, HostRuntimeStats};
#[cfg(feature = "rocm")]
pub use hip::{HipDeviceBuffer, HipRuntime};
pub use runtime::DeviceRuntime;
pub use status::DeviceStatus;
