//! Device runtime outcome codes

use std::fmt;

/// HIP success code
pub const STATUS_SUCCESS: i32 = 0;

/// Outcome of a device runtime call
///
/// Numeric codes follow the HIP runtime so that a real device and the host
/// simulation report the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    /// `hipSuccess`
    Success,
    /// `hipErrorInvalidValue`
    InvalidValue,
    /// `hipErrorOutOfMemory`
    OutOfMemory,
    /// `hipErrorInvalidDevicePointer`
    InvalidDevicePointer,
    /// `hipErrorNoDevice`
    NoDevice,
    /// Any other runtime code
    Unknown(i32),
}

impl DeviceStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            STATUS_SUCCESS => DeviceStatus::Success,
            1 => DeviceStatus::InvalidValue,
            2 => DeviceStatus::OutOfMemory,
            17 => DeviceStatus::InvalidDevicePointer,
            100 => DeviceStatus::NoDevice,
            other => DeviceStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            DeviceStatus::Success => STATUS_SUCCESS,
            DeviceStatus::InvalidValue => 1,
            DeviceStatus::OutOfMemory => 2,
            DeviceStatus::InvalidDevicePointer => 17,
            DeviceStatus::NoDevice => 100,
            DeviceStatus::Unknown(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeviceStatus::Success)
    }

    /// `Ok(())` for success, `Err(self)` otherwise
    pub fn into_result(self) -> Result<(), DeviceStatus> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Success => write!(f, "no error"),
            DeviceStatus::InvalidValue => write!(f, "invalid argument"),
            DeviceStatus::OutOfMemory => write!(f, "out of memory"),
            DeviceStatus::InvalidDevicePointer => write!(f, "invalid device pointer"),
            DeviceStatus::NoDevice => write!(f, "no ROCm-capable device is detected"),
            DeviceStatus::Unknown(code) => write!(f, "unknown error (code {})", code),
        }
    }
}
