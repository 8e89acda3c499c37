//! Neural-layer bookkeeping
//!
//! Inert configuration a future layer constructor consumes. Nothing in device
//! staging depends on it.

mod ids;

pub use ids::{IdRegistry, IDS_PER_LAYER};

use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::error::ForgeResult;

/// Node count of every layer, input layer first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSet {
    nodes_per_layer: Vec<usize>,
}

impl LayerSet {
    /// Every layer must have at least one node
    pub fn new(nodes_per_layer: Vec<usize>) -> ForgeResult<Self> {
        if let Some(layer) = nodes_per_layer.iter().position(|&n| n == 0) {
            return Err(config_error!("layer {} has no nodes", layer));
        }
        Ok(Self { nodes_per_layer })
    }

    /// Number of layers
    pub fn layers(&self) -> usize {
        self.nodes_per_layer.len()
    }

    pub fn nodes_per_layer(&self) -> &[usize] {
        &self.nodes_per_layer
    }

    /// Node count for one layer
    pub fn nodes(&self, layer: usize) -> Option<usize> {
        self.nodes_per_layer.get(layer).copied()
    }

    /// `(rows, columns)` of the weight matrix between consecutive layers
    pub fn weight_shapes(&self) -> Vec<(usize, usize)> {
        self.nodes_per_layer
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    pub fn to_json(&self) -> ForgeResult<String> {
        serde_json::to_string(self).map_err(|e| config_error!("layer set encoding failed: {}", e))
    }

    /// Parse and validate a serialized layer set
    pub fn from_json(json: &str) -> ForgeResult<Self> {
        let raw: LayerSet = serde_json::from_str(json)
            .map_err(|e| config_error!("invalid layer set: {}", e))?;
        Self::new(raw.nodes_per_layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_counts() {
        let set = LayerSet::new(vec![4, 8, 2]).unwrap();
        assert_eq!(set.layers(), 3);
        assert_eq!(set.nodes(1), Some(8));
        assert_eq!(set.nodes(3), None);
    }

    #[test]
    fn test_weight_shapes_between_layers() {
        let set = LayerSet::new(vec![4, 8, 2]).unwrap();
        assert_eq!(set.weight_shapes(), vec![(4, 8), (8, 2)]);
        assert!(LayerSet::default().weight_shapes().is_empty());
    }

    #[test]
    fn test_empty_layer_rejected() {
        let err = LayerSet::new(vec![3, 0]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: layer 1 has no nodes");
    }

    #[test]
    fn test_json_round_trip_validates() {
        let set = LayerSet::new(vec![2, 3]).unwrap();
        let json = set.to_json().unwrap();
        assert_eq!(json, r#"{"nodes_per_layer":[2,3]}"#);
        assert_eq!(LayerSet::from_json(&json).unwrap(), set);

        assert!(LayerSet::from_json(r#"{"nodes_per_layer":[2,0]}"#).is_err());
        assert!(LayerSet::from_json("not json").is_err());
    }
}
