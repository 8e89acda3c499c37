//! Sorted registry of taken node identifiers

use std::collections::BTreeSet;

use crate::error::{ForgeResult, MatForgeError};

/// Width of the identifier block reserved for each layer
pub const IDS_PER_LAYER: u32 = 1000;

/// Set of taken identifiers, kept sorted and unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRegistry {
    taken: BTreeSet<u32>,
    newest: Option<u32>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of taken identifiers
    pub fn count(&self) -> usize {
        self.taken.len()
    }

    /// Most recently handed out or inserted identifier
    pub fn newest(&self) -> Option<u32> {
        self.newest
    }

    pub fn contains(&self, id: u32) -> bool {
        self.taken.contains(&id)
    }

    /// Mark `id` as taken; returns false if it already was
    pub fn insert(&mut self, id: u32) -> bool {
        let inserted = self.taken.insert(id);
        if inserted {
            self.newest = Some(id);
        }
        inserted
    }

    /// Hand out a free identifier.
    ///
    /// Layer 0 gets the identifier after the current maximum (1 when empty).
    /// Layer `n > 0` gets the lowest free identifier in
    /// `n * 1000 .. (n + 1) * 1000`.
    pub fn allocate(&mut self, layer: u32) -> ForgeResult<u32> {
        let free = if layer == 0 {
            match self.taken.last() {
                Some(&max) => max.checked_add(1),
                None => Some(1),
            }
        } else {
            self.first_free_in_block(layer)
        };
        let id = free.ok_or(MatForgeError::IdExhausted { layer })?;

        self.taken.insert(id);
        self.newest = Some(id);
        tracing::trace!(layer, id, "IdRegistry::allocate");
        Ok(id)
    }

    fn first_free_in_block(&self, layer: u32) -> Option<u32> {
        let start = layer.checked_mul(IDS_PER_LAYER)?;
        let end = start.checked_add(IDS_PER_LAYER)?;

        let mut candidate = start;
        for &id in self.taken.range(start..end) {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        (candidate < end).then_some(candidate)
    }

    /// Taken identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.taken.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_zero_appends_after_max() {
        let mut ids = IdRegistry::new();
        assert_eq!(ids.allocate(0).unwrap(), 1);
        assert_eq!(ids.allocate(0).unwrap(), 2);

        ids.insert(40);
        assert_eq!(ids.allocate(0).unwrap(), 41);
        assert_eq!(ids.newest(), Some(41));
    }

    #[test]
    fn test_layer_block_fills_gaps() {
        let mut ids = IdRegistry::new();
        ids.insert(2000);
        ids.insert(2001);
        ids.insert(2003);

        assert_eq!(ids.allocate(2).unwrap(), 2002);
        assert_eq!(ids.allocate(2).unwrap(), 2004);
        assert_eq!(ids.allocate(1).unwrap(), 1000);
    }

    #[test]
    fn test_ids_stay_sorted_and_unique() {
        let mut ids = IdRegistry::new();
        for layer in [3, 1, 3, 0, 1] {
            ids.allocate(layer).unwrap();
        }
        let all: Vec<u32> = ids.iter().collect();
        let mut sorted = all.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(all, sorted);
        assert_eq!(ids.count(), 5);
        assert!(!ids.insert(3000));
    }

    #[test]
    fn test_full_block_is_exhausted() {
        let mut ids = IdRegistry::new();
        for id in 5000..6000 {
            ids.insert(id);
        }
        assert!(matches!(
            ids.allocate(5),
            Err(MatForgeError::IdExhausted { layer: 5 })
        ));
    }

    #[test]
    fn test_overflowing_layer_is_exhausted() {
        let mut ids = IdRegistry::new();
        assert!(ids.allocate(u32::MAX).is_err());
    }
}
