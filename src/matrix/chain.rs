//! Ordered grouping of rank-2 matrices
//!
//! Replaces a raw "next matrix" link with an owned sequence. Each matrix keeps
//! its own shape; successors are found by index, so there is nothing to dangle.

use super::Mat2D;

/// Position of a matrix inside a [`MatrixChain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixIndex(pub usize);

/// Ordered sequence of independently shaped matrices (e.g. per-layer weights)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixChain {
    matrices: Vec<Mat2D>,
}

impl MatrixChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matrix and return its position
    pub fn push(&mut self, matrix: Mat2D) -> MatrixIndex {
        let index = MatrixIndex(self.matrices.len());
        tracing::trace!(
            index = index.0,
            rows = matrix.rows(),
            columns = matrix.columns(),
            "MatrixChain::push"
        );
        self.matrices.push(matrix);
        index
    }

    pub fn get(&self, index: MatrixIndex) -> Option<&Mat2D> {
        self.matrices.get(index.0)
    }

    /// The matrix linked after `index`, if any
    pub fn next_of(&self, index: MatrixIndex) -> Option<&Mat2D> {
        index.0.checked_add(1).and_then(|i| self.matrices.get(i))
    }

    pub fn first(&self) -> Option<&Mat2D> {
        self.matrices.first()
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mat2D> {
        self.matrices.iter()
    }

    /// Cells across every matrix in the chain
    pub fn total_cells(&self) -> usize {
        self.matrices.iter().map(Mat2D::len).sum()
    }

    pub fn into_vec(self) -> Vec<Mat2D> {
        self.matrices
    }
}

impl From<Vec<Mat2D>> for MatrixChain {
    fn from(matrices: Vec<Mat2D>) -> Self {
        Self { matrices }
    }
}

impl FromIterator<Mat2D> for MatrixChain {
    fn from_iter<I: IntoIterator<Item = Mat2D>>(iter: I) -> Self {
        Self {
            matrices: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MatrixChain {
    type Item = &'a Mat2D;
    type IntoIter = std::slice::Iter<'a, Mat2D>;

    fn into_iter(self) -> Self::IntoIter {
        self.matrices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(rows: usize, columns: usize) -> Mat2D {
        Mat2D::zeros(rows, columns).unwrap()
    }

    #[test]
    fn test_push_returns_sequential_indices() {
        let mut chain = MatrixChain::new();
        assert!(chain.is_empty());

        let a = chain.push(layer(4, 3));
        let b = chain.push(layer(3, 2));

        assert_eq!(a, MatrixIndex(0));
        assert_eq!(b, MatrixIndex(1));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get(b).map(Mat2D::shape), Some((3, 2)));
    }

    #[test]
    fn test_next_of_follows_order() {
        let chain: MatrixChain = vec![layer(4, 3), layer(3, 2), layer(2, 1)].into();

        assert_eq!(chain.next_of(MatrixIndex(0)).map(Mat2D::shape), Some((3, 2)));
        assert_eq!(chain.next_of(MatrixIndex(1)).map(Mat2D::shape), Some((2, 1)));
        assert!(chain.next_of(MatrixIndex(2)).is_none());
        assert!(chain.next_of(MatrixIndex(usize::MAX)).is_none());
    }

    #[test]
    fn test_total_cells_spans_shapes() {
        let chain: MatrixChain = [layer(4, 3), layer(3, 2)].into_iter().collect();
        assert_eq!(chain.total_cells(), 18);
        assert_eq!(chain.first().map(Mat2D::shape), Some((4, 3)));
        assert_eq!((&chain).into_iter().count(), 2);
    }
}
