//! GeoJSON output for decoded features.
//!
//! Tile-local coordinates are projected back to WGS84 longitude/latitude with
//! the inverse spherical Mercator transform, relative to the tile's column,
//! row and zoom.

use std::f64::consts::PI;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::classify::classify_rings;
use crate::error::Result;
use crate::feature::{Feature, GeomType};
use crate::geometry::Point;
use crate::layer::Layer;
use crate::value::{serialize_u64, Value};

/// `[longitude, latitude]` in degrees.
pub type LngLat = [f64; 2];

const INV_PI: f64 = 360.0 / PI;

/// Maps tile-local coordinates of one tile to longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileProjection {
    x0: f64,
    y0: f64,
    scale: f64,
}

impl TileProjection {
    pub fn new(extent: u32, x: u32, y: u32, z: u32) -> Self {
        let extent = f64::from(extent);
        let size = extent * 2f64.powi(z as i32);
        TileProjection {
            x0: extent * f64::from(x),
            y0: extent * f64::from(y),
            scale: 360.0 / size,
        }
    }

    pub fn project(&self, p: Point) -> LngLat {
        let lon = (f64::from(p.x) + self.x0) * self.scale - 180.0;
        let y2 = 180.0 - (f64::from(p.y) + self.y0) * self.scale;
        let lat = INV_PI * (y2 * PI / 180.0).exp().atan() - 90.0;
        [lon, lat]
    }

    pub fn project_line(&self, line: &[Point]) -> Vec<LngLat> {
        line.iter().map(|&p| self.project(p)).collect()
    }
}

/// GeoJSON coordinates, by nesting depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coordinates {
    /// Point
    Position(LngLat),
    /// MultiPoint, LineString
    Positions(Vec<LngLat>),
    /// MultiLineString, Polygon
    Lines(Vec<Vec<LngLat>>),
    /// MultiPolygon
    Polygons(Vec<Vec<Vec<LngLat>>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geom_type: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_id")]
    pub id: Option<u64>,
    pub geometry: Geometry,
    pub properties: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<GeoJsonFeature>,
}

impl Feature<'_> {
    /// GeoJSON feature for tile `x`/`y` at zoom `z`.
    ///
    /// A geometry made of a single part uses the plain type name; several
    /// parts give the `Multi` type with one more level of nesting.
    pub fn to_geojson(&self, x: u32, y: u32, z: u32) -> Result<GeoJsonFeature> {
        let projection = TileProjection::new(self.extent(), x, y, z);
        let lines = self.load_geometry()?;
        let geom_type = self.geom_type();

        let (coordinates, multi) = match geom_type {
            GeomType::Point => {
                let mut points: Vec<LngLat> = lines
                    .iter()
                    .filter_map(|line| line.first())
                    .map(|&p| projection.project(p))
                    .collect();
                if points.len() == 1 {
                    (Coordinates::Position(points.remove(0)), false)
                } else {
                    (Coordinates::Positions(points), true)
                }
            }
            GeomType::LineString | GeomType::Unknown => {
                let mut projected: Vec<Vec<LngLat>> = if geom_type == GeomType::Unknown {
                    // No known geometry semantics: keep tile coordinates.
                    lines.iter().map(|line| tile_coords(line)).collect()
                } else {
                    lines.iter().map(|line| projection.project_line(line)).collect()
                };
                if projected.len() == 1 {
                    (Coordinates::Positions(projected.remove(0)), false)
                } else {
                    (Coordinates::Lines(projected), true)
                }
            }
            GeomType::Polygon => {
                let mut polygons: Vec<Vec<Vec<LngLat>>> = classify_rings(lines)
                    .iter()
                    .map(|rings| rings.iter().map(|ring| projection.project_line(ring)).collect())
                    .collect();
                if polygons.len() == 1 {
                    (Coordinates::Lines(polygons.remove(0)), false)
                } else {
                    (Coordinates::Polygons(polygons), true)
                }
            }
        };

        let name = geom_type.name();
        Ok(GeoJsonFeature {
            kind: "Feature",
            id: self.id(),
            geometry: Geometry {
                geom_type: if multi { format!("Multi{name}") } else { name.to_string() },
                coordinates,
            },
            properties: self.properties().clone(),
        })
    }
}

impl Layer<'_> {
    /// Every feature of the layer as one `FeatureCollection`.
    pub fn to_geojson(&self, x: u32, y: u32, z: u32) -> Result<FeatureCollection> {
        let features = self
            .features()
            .map(|feature| feature?.to_geojson(x, y, z))
            .collect::<Result<Vec<_>>>()?;
        Ok(FeatureCollection {
            kind: "FeatureCollection",
            features,
        })
    }
}

fn serialize_id<S: Serializer>(
    id: &Option<u64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match id {
        Some(id) => serialize_u64(id, serializer),
        None => serializer.serialize_none(),
    }
}

fn tile_coords(line: &[Point]) -> Vec<LngLat> {
    line.iter().map(|p| [f64::from(p.x), f64::from(p.y)]).collect()
}
