use std::borrow::Cow;
use std::io::Read;
use std::ops::Range;

use flate2::read::GzDecoder;
use indexmap::IndexMap;

use crate::error::Result;
use crate::layer::Layer;
use crate::pbf::Pbf;

/// A decoded tile: its layers keyed by name in order of first appearance.
///
/// Layers without features are left out. A later layer reusing a name
/// replaces the earlier one but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct VectorTile<'a> {
    pub layers: IndexMap<String, Layer<'a>>,
}

impl<'a> VectorTile<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let mut layers = IndexMap::new();
        for_each_layer(buf, |_, layer| {
            layers.insert(layer.name().to_string(), layer);
        })?;
        Ok(VectorTile { layers })
    }

    pub fn layer(&self, name: &str) -> Option<&Layer<'a>> {
        self.layers.get(name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }
}

/// Byte range of each layer message body, keyed and ordered like
/// [`VectorTile::layers`]. [`Layer::at`] decodes a single entry again.
pub fn layer_ranges(buf: &[u8]) -> Result<IndexMap<String, Range<usize>>> {
    let mut ranges = IndexMap::new();
    for_each_layer(buf, |range, layer| {
        ranges.insert(layer.name().to_string(), range);
    })?;
    Ok(ranges)
}

// Calls `f` with every layer that has features, in stream order.
fn for_each_layer<'a>(buf: &'a [u8], mut f: impl FnMut(Range<usize>, Layer<'a>)) -> Result<()> {
    let mut pbf = Pbf::new(buf);
    pbf.read_fields(buf.len(), |tag, pbf| {
        if tag == 3 {
            let end = pbf.read_length_end()?;
            let start = pbf.position();
            let layer = Layer::read(pbf, end)?;
            if !layer.is_empty() {
                f(start..end, layer);
            }
        }
        Ok(())
    })
}

// Gzip magic number
pub fn is_gzipped(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1F && data[1] == 0x8B
}

/// Inflates gzipped tile data; anything else is passed through borrowed.
pub fn decompress_gzip(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !is_gzipped(data) {
        return Ok(Cow::Borrowed(data));
    }

    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(Cow::Owned(decompressed))
}
