//! Cursor over a tile buffer, on top of `prost`'s wire-format primitives.
//!
//! `Pbf` walks an immutable byte buffer with a cursor it owns. Decoders that
//! need to come back to a message later record the cursor position and build
//! a fresh reader over the same buffer, so no position is ever shared between
//! two decode calls.

use prost::bytes::Buf;
use prost::encoding::{decode_key, decode_varint, skip_field, DecodeContext, WireType};

use crate::error::{DecodeError, Result};

#[derive(Debug, Clone)]
pub struct Pbf<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Pbf<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Reader over `buf` positioned at `pos`.
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Visit every field between the cursor and `end`.
    ///
    /// The callback receives the field number and the reader positioned at the
    /// field payload. A callback that does not consume the payload leaves the
    /// cursor where it was, and the field is skipped according to its wire type.
    pub fn read_fields<F>(&mut self, end: usize, mut f: F) -> Result<()>
    where
        F: FnMut(u32, &mut Pbf<'a>) -> Result<()>,
    {
        while self.pos < end {
            let (tag, wire_type) = self.decode(|buf| decode_key(buf))?;
            let start = self.pos;
            f(tag, self)?;
            if self.pos == start {
                self.skip(tag, wire_type)?;
            }
        }
        Ok(())
    }

    /// Reads a length prefix and returns the absolute end offset of the payload.
    pub fn read_length_end(&mut self) -> Result<usize> {
        let len = self.read_varint()? as usize;
        let end = self.pos.saturating_add(len);
        if end > self.buf.len() {
            return Err(DecodeError::UnexpectedEof(self.buf.len()));
        }
        Ok(end)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        self.decode(|buf| decode_varint(buf))
    }

    /// Zig-zag encoded signed varint (`sint32`/`sint64`).
    pub fn read_svarint(&mut self) -> Result<i64> {
        let n = self.read_varint()?;
        Ok((n >> 1) as i64 ^ -((n & 1) as i64))
    }

    /// Two's complement signed varint (`int64`).
    pub fn read_varint64(&mut self) -> Result<i64> {
        Ok(self.read_varint()? as i64)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_varint()? != 0)
    }

    pub fn read_float(&mut self) -> Result<f32> {
        Ok(self.take(4)?.get_f32_le())
    }

    pub fn read_double(&mut self) -> Result<f64> {
        Ok(self.take(8)?.get_f64_le())
    }

    /// Length-prefixed UTF-8 string. Invalid sequences are replaced rather
    /// than rejected.
    pub fn read_string(&mut self) -> Result<String> {
        let end = self.read_length_end()?;
        let s = String::from_utf8_lossy(&self.buf[self.pos..end]).into_owned();
        self.pos = end;
        Ok(s)
    }

    /// Skips the payload of field `tag`. Groups are deprecated and not
    /// accepted in tiles.
    pub fn skip(&mut self, tag: u32, wire_type: WireType) -> Result<()> {
        match wire_type {
            WireType::StartGroup | WireType::EndGroup => {
                Err(DecodeError::UnsupportedWireType(wire_type as u8))
            }
            _ => self.decode(|buf| skip_field(wire_type, tag, buf, DecodeContext::default())),
        }
    }

    // Runs a prost decoder on the unread bytes and moves the cursor past
    // whatever it consumed.
    fn decode<T>(
        &mut self,
        decode: impl FnOnce(&mut &'a [u8]) -> std::result::Result<T, prost::DecodeError>,
    ) -> Result<T> {
        let mut rest = self
            .buf
            .get(self.pos..)
            .ok_or(DecodeError::UnexpectedEof(self.buf.len()))?;
        let value = decode(&mut rest)?;
        self.pos = self.buf.len() - rest.len();
        Ok(value)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.saturating_add(n);
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEof(self.buf.len()))?;
        self.pos = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{put_bytes_field, put_varint, put_varint_field, zigzag};

    #[test]
    fn test_read_multi_byte_varint() {
        let mut buf = Vec::new();
        put_varint(&mut buf, 300);
        put_varint(&mut buf, 3000003150561);
        let mut pbf = Pbf::new(&buf);
        assert_eq!(pbf.read_varint().unwrap(), 300);
        assert_eq!(pbf.read_varint().unwrap(), 3000003150561);
        assert_eq!(pbf.position(), buf.len());
    }

    #[test]
    fn test_svarint_round_trips_negative_deltas() {
        let mut buf = Vec::new();
        for v in [0i64, -1, 1, -32, 1731] {
            put_varint(&mut buf, zigzag(v));
        }
        let mut pbf = Pbf::new(&buf);
        let decoded: Vec<i64> = (0..5).map(|_| pbf.read_svarint().unwrap()).collect();
        assert_eq!(decoded, vec![0, -1, 1, -32, 1731]);
    }

    #[test]
    fn test_varint64_reads_negative_int64() {
        let mut buf = Vec::new();
        put_varint(&mut buf, (-5i64) as u64);
        let mut pbf = Pbf::new(&buf);
        assert_eq!(pbf.read_varint64().unwrap(), -5);
    }

    #[test]
    fn test_truncated_varint_is_an_error() {
        let buf = [0x80u8, 0x80];
        let mut pbf = Pbf::new(&buf);
        assert!(matches!(pbf.read_varint(), Err(DecodeError::Protobuf(_))));
    }

    #[test]
    fn test_overlong_varint_is_an_error() {
        let buf = [0xffu8; 11];
        let mut pbf = Pbf::new(&buf);
        assert!(matches!(pbf.read_varint(), Err(DecodeError::Protobuf(_))));
    }

    #[test]
    fn test_string_length_past_end_is_an_error() {
        let buf = [0x05u8, b'a', b'b'];
        let mut pbf = Pbf::new(&buf);
        assert!(matches!(
            pbf.read_string(),
            Err(DecodeError::UnexpectedEof(3))
        ));
    }

    #[test]
    fn test_read_fields_skips_unconsumed_fields() {
        let mut buf = Vec::new();
        put_varint_field(&mut buf, 1, 42);
        put_bytes_field(&mut buf, 9, b"ignored payload");
        put_varint_field(&mut buf, 2, 7);

        let mut seen = Vec::new();
        let mut pbf = Pbf::new(&buf);
        pbf.read_fields(buf.len(), |tag, pbf| {
            if tag != 9 {
                seen.push((tag, pbf.read_varint()?));
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![(1, 42), (2, 7)]);
        assert_eq!(pbf.position(), buf.len());
    }

    #[test]
    fn test_skipping_truncated_field_is_an_error() {
        let mut buf = Vec::new();
        put_bytes_field(&mut buf, 9, b"payload");
        buf.truncate(buf.len() - 2);
        let mut pbf = Pbf::new(&buf);
        assert!(pbf.read_fields(buf.len(), |_, _| Ok(())).is_err());
    }

    #[test]
    fn test_fixed_width_reads() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1.5f32.to_le_bytes());
        buf.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut pbf = Pbf::new(&buf);
        assert_eq!(pbf.read_float().unwrap(), 1.5);
        assert_eq!(pbf.read_double().unwrap(), -2.25);
        assert!(pbf.read_float().is_err());
    }

    #[test]
    fn test_group_wire_type_cannot_be_skipped() {
        // field 1, wire type 3 (start group)
        let buf = [0x0bu8, 0x00];
        let mut pbf = Pbf::new(&buf);
        assert!(matches!(
            pbf.read_fields(buf.len(), |_, _| Ok(())),
            Err(DecodeError::UnsupportedWireType(3))
        ));
    }
}
