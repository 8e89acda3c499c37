//! Device-resident counterpart of a host matrix

use crate::backend::DeviceRuntime;
use crate::error::{ForgeResult, MatForgeError};
use crate::matrix::Mat2D;

/// Matrix whose cells live in accelerator memory
///
/// The shape always equals the host matrix it was staged from. The matrix owns
/// its buffer handle; release it with [`DeviceMatrix::release`] on the runtime
/// that allocated it.
#[derive(Debug)]
pub struct DeviceMatrix<B> {
    rows: usize,
    columns: usize,
    buffer: B,
}

impl<B> DeviceMatrix<B> {
    pub(crate) fn new(rows: usize, columns: usize, buffer: B) -> Self {
        Self {
            rows,
            columns,
            buffer,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the device region in bytes
    pub fn byte_size(&self) -> usize {
        self.len() * std::mem::size_of::<f32>()
    }

    /// Runtime handle for the device region
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Copy every cell back into host memory
    pub fn read_back<R>(&self, runtime: &R) -> ForgeResult<Vec<f32>>
    where
        R: DeviceRuntime<Buffer = B>,
    {
        let mut cells = vec![0.0f32; self.len()];
        runtime
            .copy_device_to_host(&self.buffer, &mut cells)
            .map_err(|status| {
                tracing::error!(
                    "Reading back {}x{} matrix failed: {}",
                    self.rows,
                    self.columns,
                    runtime.describe(status)
                );
                MatForgeError::ReadBackFailed(status)
            })?;
        Ok(cells)
    }

    /// Read back into a new host matrix of the same shape
    pub fn to_host<R>(&self, runtime: &R) -> ForgeResult<Mat2D>
    where
        R: DeviceRuntime<Buffer = B>,
    {
        Mat2D::from_vec(self.read_back(runtime)?, self.rows, self.columns)
    }

    /// Free the device region
    pub fn release<R>(self, runtime: &mut R) -> ForgeResult<()>
    where
        R: DeviceRuntime<Buffer = B>,
    {
        tracing::debug!("Releasing {}x{} device matrix", self.rows, self.columns);
        runtime
            .free(self.buffer)
            .map_err(MatForgeError::ReleaseFailed)
    }

    /// Give up ownership of the buffer handle
    pub fn into_buffer(self) -> B {
        self.buffer
    }
}
