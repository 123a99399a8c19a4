use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{DecodeError, Result};
use crate::geometry::{self, BBox, Commands, Point};
use crate::layer::DEFAULT_EXTENT;
use crate::pbf::Pbf;
use crate::value::Value;

/// Geometry type names indexed by the integer type code.
pub const TYPES: [&str; 4] = ["Unknown", "Point", "LineString", "Polygon"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum GeomType {
    #[default]
    Unknown = 0,
    Point = 1,
    LineString = 2,
    Polygon = 3,
}

impl GeomType {
    /// Codes outside 1..=3 map to `Unknown`.
    pub fn from_code(code: u64) -> Self {
        match code {
            1 => GeomType::Point,
            2 => GeomType::LineString,
            3 => GeomType::Polygon,
            _ => GeomType::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        TYPES[self as usize]
    }
}

/// A feature view over the tile buffer.
///
/// Properties are resolved when the feature is built; the geometry is only
/// decoded when asked for, and decoded again on every call.
#[derive(Debug, Clone)]
pub struct Feature<'a> {
    buf: &'a [u8],
    id: Option<u64>,
    geom_type: Option<GeomType>,
    extent: u32,
    properties: IndexMap<String, Value>,
    geometry: Option<usize>,
}

impl<'a> Feature<'a> {
    /// Decodes a standalone feature message spanning the whole buffer, with
    /// empty key/value tables and the default extent.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let mut pbf = Pbf::new(buf);
        Self::read(&mut pbf, buf.len(), DEFAULT_EXTENT, &[], &[])
    }

    /// Decodes the feature message between the reader's cursor and `end`.
    pub(crate) fn read(
        pbf: &mut Pbf<'a>,
        end: usize,
        extent: u32,
        keys: &[String],
        values: &[Value],
    ) -> Result<Self> {
        let mut feature = Feature {
            buf: pbf.buffer(),
            id: None,
            geom_type: None,
            extent,
            properties: IndexMap::new(),
            geometry: None,
        };

        pbf.read_fields(end, |tag, pbf| {
            match tag {
                1 => feature.id = Some(pbf.read_varint()?),
                2 => feature.read_tags(pbf, keys, values)?,
                3 => feature.geom_type = Some(GeomType::from_code(pbf.read_varint()?)),
                // Only the position is kept; the field is skipped by read_fields.
                4 => feature.geometry = Some(pbf.position()),
                _ => {}
            }
            Ok(())
        })?;

        Ok(feature)
    }

    fn read_tags(&mut self, pbf: &mut Pbf, keys: &[String], values: &[Value]) -> Result<()> {
        let end = pbf.read_length_end()?;
        while pbf.position() < end {
            let key_index = pbf.read_varint()?;
            let value_index = pbf.read_varint()?;
            let key = lookup("key", keys, key_index)?;
            let value = lookup("value", values, value_index)?;
            self.properties.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Geometry type, `Unknown` when the stream never set one.
    pub fn geom_type(&self) -> GeomType {
        self.geom_type.unwrap_or_default()
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// Fresh command iterator over this feature's geometry.
    pub fn commands(&self) -> Result<Commands<'a>> {
        match self.geometry {
            Some(offset) => Commands::new(self.buf, offset),
            None => Ok(Commands::empty()),
        }
    }

    /// Decodes the geometry into lines (LineString) or rings (Polygon). Point
    /// features yield one single-point line per point.
    pub fn load_geometry(&self) -> Result<Vec<Vec<Point>>> {
        geometry::load_geometry(&mut self.commands()?)
    }

    /// `[min_x, min_y, max_x, max_y]` of the geometry in tile coordinates.
    pub fn bbox(&self) -> Result<BBox> {
        geometry::bbox(&mut self.commands()?)
    }
}

fn lookup<'t, T>(table: &'static str, entries: &'t [T], index: u64) -> Result<&'t T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| entries.get(i))
        .ok_or(DecodeError::TagIndexOutOfBounds {
            table,
            index,
            length: entries.len(),
        })
}
