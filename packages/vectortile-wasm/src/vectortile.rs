use std::ops::Range;

use indexmap::IndexMap;
use js_sys::Array;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::DecodeError;
use crate::geojson::FeatureCollection;
use crate::layer::{resolve_index, Layer};
use crate::models::{LayerInfo, ParseTileInput, TileRequest};
use crate::tile::{decompress_gzip, is_gzipped, layer_ranges, VectorTile};
use crate::{console_log, console_warn};

impl From<DecodeError> for JsValue {
    fn from(err: DecodeError) -> Self {
        JsValue::from_str(&format!("Failed to decode vector tile: {}", err))
    }
}

// Plain objects rather than ES2015 Maps, so results can go straight to JSON.stringify
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))
}

/// Decodes a (possibly gzipped) tile and returns a `FeatureCollection` per
/// layer, keyed by layer name in tile order.
pub fn tile_to_geojson(
    data: &[u8],
    input: &ParseTileInput,
) -> Result<IndexMap<String, FeatureCollection>, DecodeError> {
    let data = decompress_gzip(data)?;
    let tile = VectorTile::new(&data)?;
    let TileRequest { x, y, z } = input.tile();

    let mut collections = IndexMap::new();
    for (name, layer) in &tile.layers {
        if input.wants_layer(name) {
            collections.insert(name.clone(), layer.to_geojson(x, y, z)?);
        }
    }
    Ok(collections)
}

/// Parse a vector tile into GeoJSON, one FeatureCollection per layer
#[wasm_bindgen(js_name = parseVectorTile)]
pub fn parse_vector_tile(data: &[u8], input_js: JsValue) -> Result<JsValue, JsValue> {
    let input: ParseTileInput = from_value(input_js)?;

    if is_gzipped(data) {
        console_log!("Detected gzipped tile, decompressing...");
    }

    let collections = tile_to_geojson(data, &input)?;

    if let Some(ref wanted) = input.layers {
        for name in wanted.iter().filter(|name| !collections.contains_key(*name)) {
            console_warn!(
                "Source layer '{}' not found in tile {}/{}/{}",
                name,
                input.z,
                input.x,
                input.y
            );
        }
    }

    console_log!(
        "Parsed tile {}/{}/{}: {} layers",
        input.z,
        input.x,
        input.y,
        collections.len()
    );

    to_js(&collections)
}

/// A tile buffer held on the Rust side.
///
/// Only the byte range of each layer is kept. A call decodes the header of
/// the layer it names and then only the feature it needs; no geometry is
/// kept between calls.
#[wasm_bindgen]
pub struct VectorTileHandle {
    data: Vec<u8>,
    layers: IndexMap<String, Range<usize>>,
}

#[wasm_bindgen]
impl VectorTileHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8]) -> Result<VectorTileHandle, JsValue> {
        if is_gzipped(data) {
            console_log!("Detected gzipped tile, decompressing...");
        }
        let data = decompress_gzip(data)?.into_owned();
        let layers = layer_ranges(&data)?;
        console_log!("Loaded vector tile: {} bytes, {} layers", data.len(), layers.len());
        Ok(VectorTileHandle { data, layers })
    }

    #[wasm_bindgen(js_name = layerNames)]
    pub fn layer_names(&self) -> Array {
        self.layers.keys().map(|name| JsValue::from_str(name)).collect()
    }

    #[wasm_bindgen(js_name = layerInfo)]
    pub fn layer_info(&self, layer: &str) -> Result<JsValue, JsValue> {
        self.with_layer(layer, |layer| {
            to_js(&LayerInfo {
                name: layer.name().to_string(),
                extent: layer.extent(),
                version: layer.version(),
                length: layer.len(),
                keys: layer.keys().to_vec(),
            })
        })
    }

    #[wasm_bindgen(js_name = featureCount)]
    pub fn feature_count(&self, layer: &str) -> Result<u32, JsValue> {
        self.with_layer(layer, |layer| Ok(layer.len() as u32))
    }

    /// Tile-local rings/lines of one feature as arrays of `{x, y}`.
    #[wasm_bindgen(js_name = loadGeometry)]
    pub fn load_geometry(&self, layer: &str, index: i32) -> Result<JsValue, JsValue> {
        self.with_layer(layer, |layer| {
            let feature = layer.feature(resolve_index(index.into(), layer.len())?)?;
            to_js(&feature.load_geometry()?)
        })
    }

    /// `[minX, minY, maxX, maxY]` of one feature in tile coordinates.
    pub fn bbox(&self, layer: &str, index: i32) -> Result<Vec<i32>, JsValue> {
        self.with_layer(layer, |layer| {
            let feature = layer.feature(resolve_index(index.into(), layer.len())?)?;
            Ok(feature.bbox()?.to_vec())
        })
    }

    #[wasm_bindgen(js_name = featureToGeoJson)]
    pub fn feature_to_geojson(
        &self,
        layer: &str,
        index: i32,
        x: u32,
        y: u32,
        z: u32,
    ) -> Result<JsValue, JsValue> {
        self.with_layer(layer, |layer| {
            let feature = layer.feature(resolve_index(index.into(), layer.len())?)?;
            to_js(&feature.to_geojson(x, y, z)?)
        })
    }

    #[wasm_bindgen(js_name = layerToGeoJson)]
    pub fn layer_to_geojson(
        &self,
        layer: &str,
        x: u32,
        y: u32,
        z: u32,
    ) -> Result<JsValue, JsValue> {
        self.with_layer(layer, |layer| to_js(&layer.to_geojson(x, y, z)?))
    }
}

impl VectorTileHandle {
    fn with_layer<T>(
        &self,
        name: &str,
        f: impl FnOnce(&Layer) -> Result<T, JsValue>,
    ) -> Result<T, JsValue> {
        let range = self
            .layers
            .get(name)
            .cloned()
            .ok_or_else(|| JsValue::from_str(&format!("Layer '{}' not found in tile", name)))?;
        let layer = Layer::at(&self.data, range)?;
        f(&layer)
    }
}
