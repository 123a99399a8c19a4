use std::ops::Range;

use crate::error::{DecodeError, Result};
use crate::feature::Feature;
use crate::pbf::Pbf;
use crate::value::{read_value, Value};

/// Extent used when a layer does not carry one.
pub const DEFAULT_EXTENT: u32 = 4096;
/// Version used when a layer does not carry one.
pub const DEFAULT_VERSION: u32 = 1;

/// A decoded layer header.
///
/// Keys and values are decoded up front; features are only indexed by the
/// byte offset of their message and decoded by [`Layer::feature`].
#[derive(Debug, Clone)]
pub struct Layer<'a> {
    buf: &'a [u8],
    name: String,
    extent: Option<u32>,
    version: Option<u32>,
    keys: Vec<String>,
    values: Vec<Value>,
    features: Vec<usize>,
}

impl<'a> Layer<'a> {
    /// Decodes a standalone layer message spanning the whole buffer.
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let mut pbf = Pbf::new(buf);
        Self::read(&mut pbf, buf.len())
    }

    /// Decodes the layer message occupying `range` of `buf`, as recorded by
    /// [`crate::tile::layer_ranges`].
    pub fn at(buf: &'a [u8], range: Range<usize>) -> Result<Self> {
        if range.end > buf.len() {
            return Err(DecodeError::UnexpectedEof(buf.len()));
        }
        let mut pbf = Pbf::at(buf, range.start);
        Self::read(&mut pbf, range.end)
    }

    /// Decodes the layer message between the reader's cursor and `end`.
    pub(crate) fn read(pbf: &mut Pbf<'a>, end: usize) -> Result<Self> {
        let mut layer = Layer {
            buf: pbf.buffer(),
            name: String::new(),
            extent: None,
            version: None,
            keys: Vec::new(),
            values: Vec::new(),
            features: Vec::new(),
        };

        pbf.read_fields(end, |tag, pbf| {
            match tag {
                1 => layer.name = pbf.read_string()?,
                // Offset of the length prefix; read_fields skips the body.
                2 => layer.features.push(pbf.position()),
                3 => layer.keys.push(pbf.read_string()?),
                4 => layer.values.push(read_value(pbf)?),
                5 => layer.extent = Some(pbf.read_varint()? as u32),
                15 => layer.version = Some(pbf.read_varint()? as u32),
                _ => {}
            }
            Ok(())
        })?;

        Ok(layer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extent(&self) -> u32 {
        self.extent.unwrap_or(DEFAULT_EXTENT)
    }

    pub fn version(&self) -> u32 {
        self.version.unwrap_or(DEFAULT_VERSION)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of features in the layer.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Decodes feature `index`. The geometry stays undecoded until asked for.
    pub fn feature(&self, index: usize) -> Result<Feature<'a>> {
        let offset = *self
            .features
            .get(index)
            .ok_or(DecodeError::FeatureIndexOutOfBounds {
                index: index as i64,
                length: self.features.len(),
            })?;

        let mut pbf = Pbf::at(self.buf, offset);
        let end = pbf.read_length_end()?;
        Feature::read(&mut pbf, end, self.extent(), &self.keys, &self.values)
    }

    pub fn features(&self) -> impl Iterator<Item = Result<Feature<'a>>> + '_ {
        (0..self.len()).map(move |i| self.feature(i))
    }
}

/// Converts a caller-supplied signed index into a feature index of a layer
/// with `length` features.
pub fn resolve_index(index: i64, length: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < length)
        .ok_or(DecodeError::FeatureIndexOutOfBounds { index, length })
}
