//! Rank-3, rank-4 and rank-5 host matrices
//!
//! Passive value types: they carry an identifier, their extents and one
//! contiguous buffer whose length is the product of every extent. Nothing in
//! the crate stages or renders them.

use crate::error::{ForgeResult, MatForgeError};

/// Product of all extents, rejecting zero and overflow
fn extent_product(extents: &[usize]) -> ForgeResult<usize> {
    let invalid = || MatForgeError::InvalidDimensions {
        rows: extents.first().copied().unwrap_or(0),
        columns: extents.get(1).copied().unwrap_or(0),
    };
    if extents.iter().any(|&e| e == 0) {
        return Err(invalid());
    }
    extents
        .iter()
        .try_fold(1usize, |acc, &e| acc.checked_mul(e))
        .ok_or_else(invalid)
}

fn check_len(cells: &[f32], expected: usize) -> ForgeResult<()> {
    if cells.len() != expected {
        return Err(MatForgeError::ShapeMismatch {
            expected,
            actual: cells.len(),
        });
    }
    Ok(())
}

/// Row-major offset for `index` within `extents`
fn flat_index(extents: &[usize], index: &[usize]) -> Option<usize> {
    let mut offset = 0usize;
    for (&i, &e) in index.iter().zip(extents) {
        if i >= e {
            return None;
        }
        offset = offset * e + i;
    }
    Some(offset)
}

macro_rules! higher_rank_matrix {
    (
        $(#[$meta:meta])*
        $name:ident, $rank:literal, [$($field:ident),+]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            id: i32,
            $($field: usize,)+
            cells: Vec<f32>,
        }

        impl $name {
            /// Build from a buffer whose length equals the product of the extents
            pub fn new(id: i32, $($field: usize,)+ cells: Vec<f32>) -> ForgeResult<Self> {
                let expected = extent_product(&[$($field),+])?;
                check_len(&cells, expected)?;
                Ok(Self { id, $($field,)+ cells })
            }

            /// Zero-filled buffer of the declared extents
            pub fn zeros(id: i32, $($field: usize),+) -> ForgeResult<Self> {
                let count = extent_product(&[$($field),+])?;
                Ok(Self { id, $($field,)+ cells: vec![0.0; count] })
            }

            pub fn id(&self) -> i32 {
                self.id
            }

            $(
                pub fn $field(&self) -> usize {
                    self.$field
                }
            )+

            /// Extents in declaration order
            pub fn extents(&self) -> [usize; $rank] {
                [$(self.$field),+]
            }

            pub fn len(&self) -> usize {
                self.cells.len()
            }

            pub fn is_empty(&self) -> bool {
                self.cells.is_empty()
            }

            pub fn cells(&self) -> &[f32] {
                &self.cells
            }

            /// Element lookup, row-major over the declared extents
            pub fn get(&self, index: [usize; $rank]) -> Option<f32> {
                flat_index(&self.extents(), &index).and_then(|i| self.cells.get(i).copied())
            }
        }
    };
}

higher_rank_matrix!(
    /// Rows, then columns, then levels
    Mat3D, 3, [rows, columns, levels]
);

higher_rank_matrix!(
    /// Rows, columns, levels, then time
    Mat4D, 4, [rows, columns, levels, time]
);

higher_rank_matrix!(
    /// Rows, columns, levels, time, then fractal plane
    Mat5D, 5, [rows, columns, levels, time, fractal_plane]
);
