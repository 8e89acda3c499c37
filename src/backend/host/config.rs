//! Configuration for the host-simulated device

use crate::config_error;
use crate::error::ForgeResult;

/// Environment variable for simulated device capacity in bytes
pub const DEVICE_CAPACITY_ENV: &str = "MATFORGE_DEVICE_CAPACITY";

/// Environment variable for simulated allocation alignment in bytes
pub const DEVICE_ALIGNMENT_ENV: &str = "MATFORGE_DEVICE_ALIGNMENT";

/// Default capacity: 256 MiB
pub const DEFAULT_CAPACITY_BYTES: usize = 256 * 1024 * 1024;

/// Default alignment, matching hipMalloc's minimum granularity
pub const DEFAULT_ALIGNMENT: usize = 256;

/// Configuration for [`super::HostRuntime`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRuntimeConfig {
    /// Total simulated device memory
    pub capacity_bytes: usize,
    /// Every allocation is rounded up to a multiple of this
    pub alignment: usize,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            alignment: DEFAULT_ALIGNMENT,
        }
    }
}

impl HostRuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bytes(mut self, capacity_bytes: usize) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }

    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    /// Defaults overridden by `MATFORGE_DEVICE_CAPACITY` / `MATFORGE_DEVICE_ALIGNMENT`
    pub fn from_env() -> ForgeResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(DEVICE_CAPACITY_ENV) {
            config.capacity_bytes = raw.trim().parse().map_err(|_| {
                config_error!("{} must be a byte count, got {:?}", DEVICE_CAPACITY_ENV, raw)
            })?;
        }
        if let Ok(raw) = std::env::var(DEVICE_ALIGNMENT_ENV) {
            config.alignment = raw.trim().parse().map_err(|_| {
                config_error!("{} must be a byte count, got {:?}", DEVICE_ALIGNMENT_ENV, raw)
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ForgeResult<()> {
        if !self.alignment.is_power_of_two() {
            return Err(config_error!(
                "alignment must be a power of two, got {}",
                self.alignment
            ));
        }
        Ok(())
    }

    /// Round `byte_size` up to the configured alignment
    pub(crate) fn aligned(&self, byte_size: usize) -> Option<usize> {
        let mask = self.alignment - 1;
        byte_size.checked_add(mask).map(|v| v & !mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_builder() {
        let config = HostRuntimeConfig::new()
            .with_capacity_bytes(4096)
            .with_alignment(64);
        assert_eq!(config.capacity_bytes, 4096);
        assert_eq!(config.alignment, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_alignment_rounding() {
        let config = HostRuntimeConfig::new().with_alignment(256);
        assert_eq!(config.aligned(1), Some(256));
        assert_eq!(config.aligned(256), Some(256));
        assert_eq!(config.aligned(257), Some(512));
        assert_eq!(config.aligned(usize::MAX), None);
    }

    #[test]
    fn test_non_power_of_two_alignment_rejected() {
        let config = HostRuntimeConfig::new().with_alignment(24);
        assert!(config.validate().unwrap_err().is_user_error());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var(DEVICE_CAPACITY_ENV, "1024");
        std::env::set_var(DEVICE_ALIGNMENT_ENV, "16");
        let config = HostRuntimeConfig::from_env().unwrap();
        std::env::remove_var(DEVICE_CAPACITY_ENV);
        std::env::remove_var(DEVICE_ALIGNMENT_ENV);

        assert_eq!(config.capacity_bytes, 1024);
        assert_eq!(config.alignment, 16);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage() {
        std::env::set_var(DEVICE_CAPACITY_ENV, "lots");
        let result = HostRuntimeConfig::from_env();
        std::env::remove_var(DEVICE_CAPACITY_ENV);

        assert!(result.is_err());
    }
}
