//! Lazy decoder for Mapbox Vector Tiles.
//!
//! A [`VectorTile`] indexes its layers by name. A [`Layer`] decodes its key
//! and value tables but only records where each feature starts; features are
//! decoded one at a time with [`Layer::feature`], and a [`Feature`]'s geometry
//! is decoded only when [`Feature::load_geometry`], [`Feature::bbox`] or
//! [`Feature::to_geojson`] is called.
//!
//! ```ignore
//! let tile = VectorTile::new(&bytes)?;
//! let park = tile.layers["poi_label"].feature(11)?;
//! let geojson = park.to_geojson(8801, 5371, 14)?;
//! ```
//!
//! The `vectortile` module exposes the same operations to JavaScript through
//! `wasm-bindgen`.
use wasm_bindgen::prelude::*;

// Create a console module for logging
pub mod console;
pub mod error;
pub mod pbf;
pub mod value;
pub mod geometry;
pub mod classify;
pub mod feature;
pub mod layer;
pub mod tile;
pub mod geojson;
mod geo_convert;
pub mod models;
// JS-facing functions and classes
pub mod vectortile;

#[cfg(test)]
mod test_utils;

pub use classify::{classify_rings, signed_area};
pub use error::{DecodeError, Result};
pub use feature::{Feature, GeomType, TYPES};
pub use geojson::{Coordinates, FeatureCollection, GeoJsonFeature, TileProjection};
pub use geometry::{BBox, Command, Commands, Point};
pub use layer::{Layer, DEFAULT_EXTENT, DEFAULT_VERSION};
pub use tile::{decompress_gzip, is_gzipped, VectorTile};
pub use value::Value;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => ($crate::console::warn(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("vectortile wasm module initialized (v{})", env!("CARGO_PKG_VERSION"));
    });
}
