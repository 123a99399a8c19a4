// Input structures passed in from JavaScript
use serde::{Deserialize, Serialize};

/// Tile address used to project tile-local coordinates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRequest {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Input for `parseVectorTile`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParseTileInput {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    // Only these layers are emitted when set
    #[serde(default)]
    pub layers: Option<Vec<String>>,
}

impl ParseTileInput {
    pub fn tile(&self) -> TileRequest {
        TileRequest {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    pub fn wants_layer(&self, name: &str) -> bool {
        match &self.layers {
            Some(layers) => layers.iter().any(|l| l == name),
            None => true,
        }
    }
}

/// Summary of one layer, returned by `layerInfo`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayerInfo {
    pub name: String,
    pub extent: u32,
    pub version: u32,
    pub length: usize,
    pub keys: Vec<String>,
}
