//! ROCm/HIP device runtime
//!
//! Stages matrices into real AMD GPU memory. Compiled only with the `rocm`
//! feature; links against `amdhip64`.

mod ffi;

use std::ffi::{c_void, CStr};
use std::ptr;

use super::{DeviceRuntime, DeviceStatus};
use crate::error::{ForgeResult, MatForgeError};

/// Owned `hipMalloc` allocation
///
/// Released through [`DeviceRuntime::free`]; dropping the handle without
/// freeing it leaks the device memory.
#[derive(Debug)]
pub struct HipDeviceBuffer {
    ptr: *mut c_void,
    size: usize,
}

impl HipDeviceBuffer {
    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw device pointer
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr
    }
}

/// HIP runtime bound to one device
#[derive(Debug)]
pub struct HipRuntime {
    device_id: i32,
}

impl HipRuntime {
    /// Check for a usable GPU without committing to one
    pub fn gpu_available() -> bool {
        let init = unsafe { ffi::hipInit(0) };
        if init != ffi::HIP_SUCCESS {
            tracing::debug!("HIP not available: hipInit failed with code {}", init);
            return false;
        }

        let mut count: i32 = 0;
        let result = unsafe { ffi::hipGetDeviceCount(&mut count) };
        if result != ffi::HIP_SUCCESS {
            tracing::debug!("HIP not available: hipGetDeviceCount failed with code {}", result);
            return false;
        }
        count > 0
    }

    /// Initialise HIP and select device 0
    pub fn new() -> ForgeResult<Self> {
        Self::with_device(0)
    }

    /// Initialise HIP and select `device_id`
    ///
    /// # Errors
    /// `DeviceUnavailable` when HIP cannot start or the device does not exist
    pub fn with_device(device_id: i32) -> ForgeResult<Self> {
        let unavailable = |status: DeviceStatus| {
            tracing::error!("HipRuntime: device {} unavailable: {}", device_id, status);
            MatForgeError::DeviceUnavailable(format!("device {}: {}", device_id, status))
        };

        DeviceStatus::from_code(unsafe { ffi::hipInit(0) })
            .into_result()
            .map_err(unavailable)?;

        let mut count: i32 = 0;
        DeviceStatus::from_code(unsafe { ffi::hipGetDeviceCount(&mut count) })
            .into_result()
            .map_err(unavailable)?;
        if device_id < 0 || device_id >= count {
            return Err(unavailable(DeviceStatus::NoDevice));
        }

        DeviceStatus::from_code(unsafe { ffi::hipSetDevice(device_id) })
            .into_result()
            .map_err(unavailable)?;
        tracing::debug!("HipRuntime: device {} selected ({} present)", device_id, count);
        Ok(Self { device_id })
    }

    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    /// `(free, total)` device memory in bytes
    pub fn memory_info(&self) -> Result<(usize, usize), DeviceStatus> {
        let mut free: usize = 0;
        let mut total: usize = 0;
        DeviceStatus::from_code(unsafe { ffi::hipMemGetInfo(&mut free, &mut total) })
            .into_result()?;
        Ok((free, total))
    }
}

impl DeviceRuntime for HipRuntime {
    type Buffer = HipDeviceBuffer;

    fn name(&self) -> &str {
        "hip"
    }

    fn allocate(&mut self, byte_size: usize) -> Result<HipDeviceBuffer, DeviceStatus> {
        if byte_size > 1024 * 1024 * 1024 {
            tracing::warn!("HipRuntime::allocate: large allocation requested: {} MB", byte_size / (1024 * 1024));
        }

        let mut ptr: *mut c_void = ptr::null_mut();
        let result = unsafe { ffi::hipMalloc(&mut ptr, byte_size) };
        tracing::trace!("HipRuntime::allocate: hipMalloc returned result={}, ptr={:?}", result, ptr);
        DeviceStatus::from_code(result).into_result()?;

        if ptr.is_null() {
            return Err(DeviceStatus::OutOfMemory);
        }
        Ok(HipDeviceBuffer {
            ptr,
            size: byte_size,
        })
    }

    fn copy_host_to_device(&mut self, dst: &HipDeviceBuffer, src: &[f32]) -> Result<(), DeviceStatus> {
        let byte_size = std::mem::size_of_val(src);
        if byte_size > dst.size {
            return Err(DeviceStatus::InvalidValue);
        }

        let result = unsafe {
            ffi::hipMemcpy(
                dst.ptr,
                src.as_ptr() as *const c_void,
                byte_size,
                ffi::HIP_MEMCPY_HOST_TO_DEVICE,
            )
        };
        DeviceStatus::from_code(result).into_result()
    }

    fn copy_device_to_host(&self, src: &HipDeviceBuffer, dst: &mut [f32]) -> Result<(), DeviceStatus> {
        let byte_size = std::mem::size_of_val(dst);
        if byte_size > src.size {
            return Err(DeviceStatus::InvalidValue);
        }

        let result = unsafe {
            ffi::hipMemcpy(
                dst.as_mut_ptr() as *mut c_void,
                src.ptr,
                byte_size,
                ffi::HIP_MEMCPY_DEVICE_TO_HOST,
            )
        };
        DeviceStatus::from_code(result).into_result()
    }

    fn free(&mut self, buffer: HipDeviceBuffer) -> Result<(), DeviceStatus> {
        if buffer.ptr.is_null() {
            return Err(DeviceStatus::InvalidDevicePointer);
        }
        DeviceStatus::from_code(unsafe { ffi::hipFree(buffer.ptr) }).into_result()
    }

    fn describe(&self, status: DeviceStatus) -> String {
        let text = unsafe { ffi::hipGetErrorString(status.code()) };
        if text.is_null() {
            return status.to_string();
        }
        unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned()
    }
}
