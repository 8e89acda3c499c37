//! Human-readable matrix listing

use std::fmt::{self, Write};

use super::Mat2D;

/// Options for [`render`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Text printed before `Matrix Values:` (empty by default)
    pub prompt: String,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// Render every cell, one line per row, prefixed by the prompt.
///
/// ```text
/// weightsMatrix Values:
/// {
///     1.000000, 2.000000, 3.000000,
///     4.000000, 5.000000, 6.000000,
/// }
/// ```
pub fn render(matrix: &Mat2D, options: &RenderOptions) -> String {
    let mut out = String::with_capacity(32 + matrix.len() * 12);
    // Writing into a String cannot fail
    let _ = write_matrix(&mut out, matrix, &options.prompt);
    out
}

fn write_matrix<W: Write>(out: &mut W, matrix: &Mat2D, prompt: &str) -> fmt::Result {
    writeln!(out, "{}Matrix Values:", prompt)?;
    writeln!(out, "{{")?;
    for row in matrix.iter_rows() {
        out.write_str("    ")?;
        for &cell in row {
            write_cell(out, cell)?;
        }
        out.write_char('\n')?;
    }
    writeln!(out, "}}")
}

/// `%f`-style cell: six decimals, lowercase `nan`/`inf`
fn write_cell<W: Write>(out: &mut W, cell: f32) -> fmt::Result {
    if cell.is_nan() {
        let sign = if cell.is_sign_negative() { "-" } else { "" };
        write!(out, "{}nan, ", sign)
    } else {
        write!(out, "{:.6}, ", cell)
    }
}

impl fmt::Display for Mat2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_matrix(f, self, "")
    }
}
