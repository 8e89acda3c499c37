//! Host to device staging
//!
//! [`stage`] allocates an accelerator region shaped like a host matrix and,
//! optionally, copies the host cells into it. Each runtime outcome is reported
//! as a `tracing` event tagged with the caller's label. Any failure is returned
//! as an error; a [`DeviceMatrix`] is only handed out when every step
//! succeeded.

mod device_matrix;
mod options;

pub use device_matrix::DeviceMatrix;
pub use options::{StageOptions, DEFAULT_LABEL};

use crate::backend::{DeviceRuntime, DeviceStatus};
use crate::error::{ForgeResult, MatForgeError};
use crate::matrix::{Mat2D, MatrixChain};

/// Emit the outcome of one runtime step
fn report<R: DeviceRuntime>(runtime: &R, label: &str, action: &str, status: DeviceStatus) {
    let text = runtime.describe(status);
    if status.is_success() {
        tracing::info!(
            target: "matforge::staging",
            label,
            runtime = runtime.name(),
            "{}: {}",
            action,
            text
        );
    } else {
        tracing::error!(
            target: "matforge::staging",
            label,
            runtime = runtime.name(),
            code = status.code(),
            "{}: {}",
            action,
            text
        );
    }
}

fn status_of<T>(result: &Result<T, DeviceStatus>) -> DeviceStatus {
    match result {
        Ok(_) => DeviceStatus::Success,
        Err(status) => *status,
    }
}

/// Stage `host` into device memory.
///
/// 1. Allocates `rows * columns * size_of::<f32>()` bytes.
/// 2. Reports the allocation outcome.
/// 3. If `options.copy_values`, copies the cells and reports that outcome.
///
/// # Errors
/// - `AllocationFailed` when the runtime cannot reserve the region
/// - `TransferFailed` when the copy fails; the region is released first
pub fn stage<R: DeviceRuntime>(
    runtime: &mut R,
    host: &Mat2D,
    options: &StageOptions,
) -> ForgeResult<DeviceMatrix<R::Buffer>> {
    let label = options.label.as_str();
    let byte_size = host.byte_size();

    let allocation = runtime.allocate(byte_size);
    report(
        &*runtime,
        label,
        &format!("Allocating memory for {} on device", label),
        status_of(&allocation),
    );
    let buffer = allocation.map_err(|status| MatForgeError::AllocationFailed {
        label: label.to_string(),
        status,
    })?;

    if options.copy_values {
        let copy = runtime.copy_host_to_device(&buffer, host.cells());
        report(
            &*runtime,
            label,
            &format!("Copying {} to device", label),
            status_of(&copy),
        );

        if let Err(status) = copy {
            if let Err(free_status) = runtime.free(buffer) {
                tracing::warn!(
                    "Releasing {} after failed copy also failed: {}",
                    label,
                    runtime.describe(free_status)
                );
            }
            return Err(MatForgeError::TransferFailed {
                label: label.to_string(),
                status,
            });
        }
    }

    Ok(DeviceMatrix::new(host.rows(), host.columns(), buffer))
}

/// Stage every matrix of a chain in order.
///
/// Matrix `i` is labelled `"<label>[i]"`. On the first failure the matrices
/// staged so far are released and the error is returned.
pub fn stage_chain<R: DeviceRuntime>(
    runtime: &mut R,
    chain: &MatrixChain,
    options: &StageOptions,
) -> ForgeResult<Vec<DeviceMatrix<R::Buffer>>> {
    let mut staged = Vec::with_capacity(chain.len());

    for (index, host) in chain.iter().enumerate() {
        let item_options = options
            .clone()
            .with_label(format!("{}[{}]", options.label, index));

        match stage(runtime, host, &item_options) {
            Ok(device) => staged.push(device),
            Err(err) => {
                for device in staged.into_iter().rev() {
                    if let Err(release_err) = device.release(runtime) {
                        tracing::warn!("Unwinding chain staging: {}", release_err);
                    }
                }
                return Err(err);
            }
        }
    }

    Ok(staged)
}
