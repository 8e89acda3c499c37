//! Host-simulated accelerator for tests and GPU-less machines.
//!
//! Device memory lives in host `Vec<f32>` storage, but the runtime keeps the
//! bookkeeping a real device does: a fixed capacity, aligned allocation sizes,
//! live-handle checks and usage statistics. Faults can be injected to exercise
//! the failure paths of staging.
//!
//! # Usage
//!
//! ```rust,ignore
//! use matforge::backend::{DeviceRuntime, HostRuntime};
//!
//! let mut runtime = HostRuntime::new();
//! let buffer = runtime.allocate(24)?;
//! runtime.copy_host_to_device(&buffer, &[1.0; 6])?;
//! ```

mod config;

pub use config::{
    HostRuntimeConfig, DEFAULT_ALIGNMENT, DEFAULT_CAPACITY_BYTES, DEVICE_ALIGNMENT_ENV,
    DEVICE_CAPACITY_ENV,
};

use std::cell::Cell;
use std::collections::HashMap;

use super::{DeviceRuntime, DeviceStatus};
use crate::error::ForgeResult;

/// Handle to a simulated allocation
///
/// Not `Clone`; a handle is owned by exactly one device matrix.
#[derive(Debug, PartialEq, Eq)]
pub struct HostBuffer {
    id: u64,
    size: usize,
}

impl HostBuffer {
    /// Allocation identifier, unique for the runtime's lifetime
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Requested size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Second handle to the same region, for exercising stale-handle paths
    #[cfg(test)]
    pub(crate) fn alias(&self) -> HostBuffer {
        HostBuffer {
            id: self.id,
            size: self.size,
        }
    }
}

/// Usage statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostRuntimeStats {
    /// Successful allocate() calls
    pub alloc_count: usize,
    /// Successful free() calls
    pub free_count: usize,
    /// Successful host to device copies
    pub h2d_copy_count: usize,
    /// Successful device to host copies
    pub d2h_copy_count: usize,
    /// Aligned bytes currently reserved
    pub bytes_in_use: usize,
    /// High-water mark of `bytes_in_use`
    pub peak_bytes: usize,
}

#[derive(Debug)]
struct Allocation {
    reserved: usize,
    cells: Vec<f32>,
}

/// Simulated accelerator runtime
#[derive(Debug)]
pub struct HostRuntime {
    config: HostRuntimeConfig,
    allocations: HashMap<u64, Allocation>,
    next_id: u64,
    available: bool,
    copy_fault: Option<DeviceStatus>,
    stats: HostRuntimeStats,
    // Read-back takes `&self`
    d2h_copies: Cell<usize>,
}

impl HostRuntime {
    /// Runtime with the default 256 MiB capacity
    pub fn new() -> Self {
        Self::from_valid_config(HostRuntimeConfig::default())
    }

    /// Runtime with a custom configuration
    pub fn with_config(config: HostRuntimeConfig) -> ForgeResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Runtime configured from the environment
    pub fn from_env() -> ForgeResult<Self> {
        Self::with_config(HostRuntimeConfig::from_env()?)
    }

    /// Runtime with a capacity of `capacity_bytes` and default alignment
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self::from_valid_config(HostRuntimeConfig::new().with_capacity_bytes(capacity_bytes))
    }

    /// Runtime that behaves like a machine without an accelerator
    pub fn unavailable() -> Self {
        let mut runtime = Self::new();
        runtime.available = false;
        runtime
    }

    fn from_valid_config(config: HostRuntimeConfig) -> Self {
        Self {
            config,
            allocations: HashMap::new(),
            next_id: 1,
            available: true,
            copy_fault: None,
            stats: HostRuntimeStats::default(),
            d2h_copies: Cell::new(0),
        }
    }

    pub fn config(&self) -> &HostRuntimeConfig {
        &self.config
    }

    /// Snapshot of the usage counters
    pub fn stats(&self) -> HostRuntimeStats {
        HostRuntimeStats {
            d2h_copy_count: self.d2h_copies.get(),
            ..self.stats.clone()
        }
    }

    /// Number of allocations not yet freed
    pub fn live_buffers(&self) -> usize {
        self.allocations.len()
    }

    /// Bytes still available for allocation
    pub fn free_bytes(&self) -> usize {
        self.config.capacity_bytes.saturating_sub(self.stats.bytes_in_use)
    }

    /// Make the next host to device copy fail with `status`
    pub fn inject_copy_failure(&mut self, status: DeviceStatus) {
        self.copy_fault = Some(status);
    }

    fn live(&self, buffer: &HostBuffer) -> Result<&Allocation, DeviceStatus> {
        self.allocations
            .get(&buffer.id)
            .ok_or(DeviceStatus::InvalidDevicePointer)
    }
}

impl Default for HostRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRuntime for HostRuntime {
    type Buffer = HostBuffer;

    fn name(&self) -> &str {
        "host-sim"
    }

    fn allocate(&mut self, byte_size: usize) -> Result<HostBuffer, DeviceStatus> {
        if !self.available {
            return Err(DeviceStatus::NoDevice);
        }
        if byte_size == 0 {
            tracing::warn!("HostRuntime::allocate: zero-size allocation requested");
            return Err(DeviceStatus::InvalidValue);
        }

        let reserved = self
            .config
            .aligned(byte_size)
            .ok_or(DeviceStatus::OutOfMemory)?;
        if reserved > self.free_bytes() {
            tracing::debug!(
                "HostRuntime::allocate: {} bytes requested, {} free of {}",
                reserved,
                self.free_bytes(),
                self.config.capacity_bytes
            );
            return Err(DeviceStatus::OutOfMemory);
        }

        let id = self.next_id;
        self.next_id += 1;

        let float_count = byte_size.div_ceil(std::mem::size_of::<f32>());
        self.allocations.insert(
            id,
            Allocation {
                reserved,
                cells: vec![0.0; float_count],
            },
        );

        self.stats.alloc_count += 1;
        self.stats.bytes_in_use += reserved;
        self.stats.peak_bytes = self.stats.peak_bytes.max(self.stats.bytes_in_use);

        tracing::trace!("HostRuntime::allocate: id={} size={} reserved={}", id, byte_size, reserved);
        Ok(HostBuffer {
            id,
            size: byte_size,
        })
    }

    fn copy_host_to_device(&mut self, dst: &HostBuffer, src: &[f32]) -> Result<(), DeviceStatus> {
        if let Some(status) = self.copy_fault.take() {
            return Err(status);
        }

        let allocation = self
            .allocations
            .get_mut(&dst.id)
            .ok_or(DeviceStatus::InvalidDevicePointer)?;
        if src.len() > allocation.cells.len() {
            return Err(DeviceStatus::InvalidValue);
        }

        allocation.cells[..src.len()].copy_from_slice(src);
        self.stats.h2d_copy_count += 1;
        Ok(())
    }

    fn copy_device_to_host(&self, src: &HostBuffer, dst: &mut [f32]) -> Result<(), DeviceStatus> {
        let allocation = self.live(src)?;
        if dst.len() > allocation.cells.len() {
            return Err(DeviceStatus::InvalidValue);
        }

        dst.copy_from_slice(&allocation.cells[..dst.len()]);
        self.d2h_copies.set(self.d2h_copies.get() + 1);
        Ok(())
    }

    fn free(&mut self, buffer: HostBuffer) -> Result<(), DeviceStatus> {
        let allocation = self
            .allocations
            .remove(&buffer.id)
            .ok_or(DeviceStatus::InvalidDevicePointer)?;

        self.stats.free_count += 1;
        self.stats.bytes_in_use -= allocation.reserved;
        tracing::trace!("HostRuntime::free: id={} released {} bytes", buffer.id, allocation.reserved);
        Ok(())
    }
}
