//! Unified error handling for matforge
//!
//! This module provides the crate-wide error type. Variants fall into the
//! following categories:
//! - Construction errors (malformed dimensions, short input buffers)
//! - Allocation errors (device memory exhausted or device unreachable)
//! - Transfer errors (host/device copies that failed)
//! - Configuration errors (invalid options or environment values)

use std::fmt;

use crate::backend::DeviceStatus;

// Re-export thiserror for convenience
pub use thiserror;

/// Unified error type for matforge
#[derive(Debug, thiserror::Error)]
pub enum MatForgeError {
    // ========== Construction Errors ==========
    /// A dimension was zero or the element count overflowed
    #[error("Invalid matrix dimensions: {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize },

    /// Input buffer holds fewer values than the requested shape needs
    #[error("Input buffer out of range: need {required} values, got {actual}")]
    OutOfRange { required: usize, actual: usize },

    /// Buffer length does not equal the product of the declared extents
    #[error("Shape mismatch: expected {expected} cells, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    // ========== Device Errors ==========
    /// Device memory allocation failed
    #[error("Device memory allocation failed for {label}: {status}")]
    AllocationFailed { label: String, status: DeviceStatus },

    /// Host to device copy failed
    #[error("Host to device transfer failed for {label}: {status}")]
    TransferFailed { label: String, status: DeviceStatus },

    /// Device to host copy failed
    #[error("Device to host read-back failed: {0}")]
    ReadBackFailed(DeviceStatus),

    /// Releasing a device buffer failed
    #[error("Device buffer release failed: {0}")]
    ReleaseFailed(DeviceStatus),

    /// No usable accelerator
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    // ========== Configuration Errors ==========
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Identifier block for a layer is full
    #[error("No free identifier left for layer {layer}")]
    IdExhausted { layer: u32 },
}

impl MatForgeError {
    /// Categorize the error for handling decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatForgeError::InvalidDimensions { .. }
            | MatForgeError::OutOfRange { .. }
            | MatForgeError::ShapeMismatch { .. } => ErrorCategory::Construction,

            MatForgeError::AllocationFailed { .. } => ErrorCategory::Allocation,

            MatForgeError::TransferFailed { .. } | MatForgeError::ReadBackFailed(_) => {
                ErrorCategory::Transfer
            }

            MatForgeError::ReleaseFailed(_) | MatForgeError::DeviceUnavailable(_) => {
                ErrorCategory::Device
            }

            MatForgeError::InvalidConfiguration(_) | MatForgeError::IdExhausted { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Construction errors are raised before any matrix exists
    pub fn is_construction_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Construction)
    }

    /// Check if the caller may retry the operation
    ///
    /// Allocation and transfer failures depend on device state, so a calling
    /// orchestrator may retry them. Nothing in this crate retries on its own.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Allocation | ErrorCategory::Transfer
        )
    }

    /// Check if this is caused by caller input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Construction | ErrorCategory::Configuration
        )
    }

    /// Device status carried by the error, if any
    pub fn device_status(&self) -> Option<DeviceStatus> {
        match self {
            MatForgeError::AllocationFailed { status, .. }
            | MatForgeError::TransferFailed { status, .. } => Some(*status),
            MatForgeError::ReadBackFailed(status) | MatForgeError::ReleaseFailed(status) => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Error category for handling decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed dimensions or insufficient input
    Construction,
    /// Device memory could not be reserved
    Allocation,
    /// A copy between host and device failed
    Transfer,
    /// Device lifecycle failure (release, availability)
    Device,
    /// Invalid options or environment
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Construction => write!(f, "Construction"),
            ErrorCategory::Allocation => write!(f, "Allocation"),
            ErrorCategory::Transfer => write!(f, "Transfer"),
            ErrorCategory::Device => write!(f, "Device"),
            ErrorCategory::Configuration => write!(f, "Configuration"),
        }
    }
}

// Helper type alias for Results using MatForgeError
pub type ForgeResult<T> = std::result::Result<T, MatForgeError>;

/// Create a configuration error with context
///
/// # Examples
/// ```ignore
/// return Err(config_error!("alignment must be a power of two, got {}", align));
/// ```
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::MatForgeError::InvalidConfiguration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::MatForgeError::InvalidConfiguration(format!($fmt, $($arg)*))
    };
}

/// Checked `rows * columns` for shapes that must be non-empty
pub(crate) fn checked_cell_count(rows: usize, columns: usize) -> ForgeResult<usize> {
    if rows == 0 || columns == 0 {
        return Err(MatForgeError::InvalidDimensions { rows, columns });
    }
    rows.checked_mul(columns)
        .ok_or(MatForgeError::InvalidDimensions { rows, columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            MatForgeError::InvalidDimensions { rows: 0, columns: 3 }.category(),
            ErrorCategory::Construction
        );
        assert_eq!(
            MatForgeError::OutOfRange { required: 6, actual: 4 }.category(),
            ErrorCategory::Construction
        );
        assert_eq!(
            MatForgeError::AllocationFailed {
                label: "w".to_string(),
                status: DeviceStatus::OutOfMemory,
            }
            .category(),
            ErrorCategory::Allocation
        );
        assert_eq!(
            MatForgeError::TransferFailed {
                label: "w".to_string(),
                status: DeviceStatus::InvalidDevicePointer,
            }
            .category(),
            ErrorCategory::Transfer
        );
        assert_eq!(
            MatForgeError::ReleaseFailed(DeviceStatus::InvalidDevicePointer).category(),
            ErrorCategory::Device
        );
        assert_eq!(
            config_error!("bad").category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(MatForgeError::AllocationFailed {
            label: "m".to_string(),
            status: DeviceStatus::OutOfMemory,
        }
        .is_recoverable());
        assert!(MatForgeError::ReadBackFailed(DeviceStatus::InvalidValue).is_recoverable());

        assert!(!MatForgeError::OutOfRange { required: 6, actual: 4 }.is_recoverable());
        assert!(!config_error!("bad").is_recoverable());
    }

    #[test]
    fn test_is_user_error() {
        assert!(MatForgeError::ShapeMismatch { expected: 8, actual: 7 }.is_user_error());
        assert!(MatForgeError::IdExhausted { layer: 2 }.is_user_error());
        assert!(!MatForgeError::ReadBackFailed(DeviceStatus::InvalidValue).is_user_error());
    }

    #[test]
    fn test_error_display() {
        let err = MatForgeError::OutOfRange { required: 6, actual: 4 };
        assert_eq!(
            err.to_string(),
            "Input buffer out of range: need 6 values, got 4"
        );

        let err = MatForgeError::AllocationFailed {
            label: "weights".to_string(),
            status: DeviceStatus::OutOfMemory,
        };
        assert_eq!(
            err.to_string(),
            "Device memory allocation failed for weights: out of memory"
        );

        let err = config_error!("alignment {} is not a power of two", 3);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: alignment 3 is not a power of two"
        );
    }

    #[test]
    fn test_device_status_accessor() {
        let err = MatForgeError::TransferFailed {
            label: "x".to_string(),
            status: DeviceStatus::Unknown(999),
        };
        assert_eq!(err.device_status(), Some(DeviceStatus::Unknown(999)));
        assert_eq!(
            MatForgeError::InvalidDimensions { rows: 0, columns: 0 }.device_status(),
            None
        );
    }

    #[test]
    fn test_checked_cell_count() {
        assert_eq!(checked_cell_count(2, 3).unwrap(), 6);
        assert!(matches!(
            checked_cell_count(0, 3),
            Err(MatForgeError::InvalidDimensions { rows: 0, columns: 3 })
        ));
        assert!(checked_cell_count(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_device_unavailable_is_not_recoverable() {
        let err =
            MatForgeError::DeviceUnavailable("device 3: no ROCm-capable device is detected".into());
        assert_eq!(err.category(), ErrorCategory::Device);
        assert!(!err.is_recoverable());
        assert!(!err.is_user_error());
        assert_eq!(err.device_status(), None);
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Construction.to_string(), "Construction");
        assert_eq!(ErrorCategory::Allocation.to_string(), "Allocation");
        assert_eq!(ErrorCategory::Transfer.to_string(), "Transfer");
    }
}
