//! Accelerator runtime interface used by device staging.

use std::fmt;

use super::DeviceStatus;

/// Primitives an accelerator runtime exposes to the staging layer.
///
/// Implementations return the raw [`DeviceStatus`] on failure; mapping into
/// crate errors and reporting diagnostics happens in [`crate::staging`].
pub trait DeviceRuntime {
    /// Owned handle to one device allocation
    type Buffer: fmt::Debug;

    /// Short runtime name for diagnostics
    fn name(&self) -> &str;

    /// Reserve `byte_size` bytes of device memory
    fn allocate(&mut self, byte_size: usize) -> Result<Self::Buffer, DeviceStatus>;

    /// Copy `src` into the start of `dst`
    fn copy_host_to_device(&mut self, dst: &Self::Buffer, src: &[f32]) -> Result<(), DeviceStatus>;

    /// Copy the first `dst.len()` floats of `src` back to the host
    fn copy_device_to_host(&self, src: &Self::Buffer, dst: &mut [f32]) -> Result<(), DeviceStatus>;

    /// Release a device allocation
    fn free(&mut self, buffer: Self::Buffer) -> Result<(), DeviceStatus>;

    /// Render an outcome as runtime text
    fn describe(&self, status: DeviceStatus) -> String {
        status.to_string()
    }
}
