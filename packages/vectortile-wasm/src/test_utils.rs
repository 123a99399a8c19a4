// Test-only protobuf writer for building vector tiles by hand.

use prost::encoding::{encode_key, encode_varint, WireType};

pub fn put_varint(buf: &mut Vec<u8>, v: u64) {
    encode_varint(v, buf);
}

pub fn zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

pub fn put_varint_field(buf: &mut Vec<u8>, tag: u32, v: u64) {
    encode_key(tag, WireType::Varint, buf);
    encode_varint(v, buf);
}

pub fn put_bytes_field(buf: &mut Vec<u8>, tag: u32, bytes: &[u8]) {
    encode_key(tag, WireType::LengthDelimited, buf);
    encode_varint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
}

pub fn put_packed_field(buf: &mut Vec<u8>, tag: u32, values: &[u32]) {
    let mut packed = Vec::new();
    for v in values {
        put_varint(&mut packed, u64::from(*v));
    }
    put_bytes_field(buf, tag, &packed);
}

pub fn value_string(s: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    put_bytes_field(&mut buf, 1, s.as_bytes());
    buf
}

pub fn value_float(f: f32) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_key(2, WireType::ThirtyTwoBit, &mut buf);
    buf.extend_from_slice(&f.to_le_bytes());
    buf
}

pub fn value_double(d: f64) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_key(3, WireType::SixtyFourBit, &mut buf);
    buf.extend_from_slice(&d.to_le_bytes());
    buf
}

pub fn value_int(i: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    put_varint_field(&mut buf, 4, i as u64);
    buf
}

pub fn value_uint(u: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    put_varint_field(&mut buf, 5, u);
    buf
}

pub fn value_sint(i: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    put_varint_field(&mut buf, 6, zigzag(i));
    buf
}

pub fn value_bool(b: bool) -> Vec<u8> {
    let mut buf = Vec::new();
    put_varint_field(&mut buf, 7, u64::from(b));
    buf
}

pub fn command(id: u32, count: u32) -> u32 {
    (count << 3) | id
}

pub fn delta(d: i32) -> u32 {
    zigzag(i64::from(d)) as u32
}

/// Encodes absolute rings as a command stream: one MoveTo, one LineTo run,
/// and a ClosePath when `close` is set.
pub fn geometry(rings: &[&[(i32, i32)]], close: bool) -> Vec<u32> {
    let mut out = Vec::new();
    let (mut cx, mut cy) = (0, 0);
    for ring in rings {
        let mut emit = |out: &mut Vec<u32>, (x, y): (i32, i32)| {
            out.push(delta(x - cx));
            out.push(delta(y - cy));
            cx = x;
            cy = y;
        };
        out.push(command(1, 1));
        emit(&mut out, ring[0]);
        if ring.len() > 1 {
            out.push(command(2, (ring.len() - 1) as u32));
            for p in &ring[1..] {
                emit(&mut out, *p);
            }
        }
        if close {
            out.push(command(7, 1));
        }
    }
    out
}

pub struct FeatureFields<'f> {
    pub id: Option<u64>,
    pub tags: &'f [u32],
    pub geom_type: Option<u32>,
    pub geometry: Option<&'f [u32]>,
}

pub fn feature(fields: &FeatureFields) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(id) = fields.id {
        put_varint_field(&mut buf, 1, id);
    }
    if !fields.tags.is_empty() {
        put_packed_field(&mut buf, 2, fields.tags);
    }
    if let Some(t) = fields.geom_type {
        put_varint_field(&mut buf, 3, u64::from(t));
    }
    if let Some(g) = fields.geometry {
        put_packed_field(&mut buf, 4, g);
    }
    buf
}

pub struct LayerFields<'f> {
    pub name: &'f str,
    pub extent: Option<u32>,
    pub version: Option<u32>,
    pub keys: &'f [&'f str],
    pub values: Vec<Vec<u8>>,
    pub features: Vec<Vec<u8>>,
}

pub fn layer(fields: &LayerFields) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(v) = fields.version {
        put_varint_field(&mut buf, 15, u64::from(v));
    }
    put_bytes_field(&mut buf, 1, fields.name.as_bytes());
    for f in &fields.features {
        put_bytes_field(&mut buf, 2, f);
    }
    for k in fields.keys {
        put_bytes_field(&mut buf, 3, k.as_bytes());
    }
    for v in &fields.values {
        put_bytes_field(&mut buf, 4, v);
    }
    if let Some(e) = fields.extent {
        put_varint_field(&mut buf, 5, u64::from(e));
    }
    buf
}

pub fn tile(layers: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    for l in layers {
        put_bytes_field(&mut buf, 3, l);
    }
    buf
}

/// Layer holding a single feature.
pub fn single_feature_layer(name: &str, extent: Option<u32>, fields: &FeatureFields) -> Vec<u8> {
    layer(&LayerFields {
        name,
        extent,
        version: Some(2),
        keys: &[],
        values: Vec::new(),
        features: vec![feature(fields)],
    })
}
