//! Shared fixtures for integration tests

#![allow(dead_code)]

use matforge::backend::HostRuntime;
use matforge::Mat2D;
use proptest::prelude::*;

/// The 2x3 matrix used throughout the scenarios
pub fn sample_matrix() -> Mat2D {
    Mat2D::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).expect("valid 2x3 matrix")
}

/// Host runtime with room for exactly `bytes` (default alignment)
pub fn runtime_with_capacity(bytes: usize) -> HostRuntime {
    HostRuntime::with_capacity(bytes)
}

/// Strategy producing `(values, rows, columns)` with `values.len() == rows * columns`
pub fn matrix_input() -> impl Strategy<Value = (Vec<f32>, usize, usize)> {
    (1usize..8, 1usize..8).prop_flat_map(|(rows, columns)| {
        (
            prop::collection::vec(-1.0e6f32..1.0e6, rows * columns),
            Just(rows),
            Just(columns),
        )
    })
}
