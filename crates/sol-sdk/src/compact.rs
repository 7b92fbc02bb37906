//! Compact-u16 length prefixes and the byte cursor used by the decoders.
//!
//! Every variable-size sequence on the wire is prefixed with its length in
//! 7-bit little-endian groups, bit 7 of each byte except the last set as a
//! continuation flag:
//!
//! ```text
//!   0x0000..=0x007f   1 byte    0b0xxxxxxx
//!   0x0080..=0x3fff   2 bytes   0b1xxxxxxx 0b0xxxxxxx
//!   0x4000..=0xffff   3 bytes   0b1xxxxxxx 0b1xxxxxxx 0b000000xx
//! ```

use crate::error::SdkError;

/// Longest valid compact-u16 encoding.
pub const MAX_ENCODING_LENGTH: usize = 3;

/// Encode a `u16` value in compact-u16 format.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_ENCODING_LENGTH);
    write_compact_u16(&mut out, value);
    out
}

/// Append the compact-u16 encoding of `value` to `buf`.
pub fn write_compact_u16(buf: &mut Vec<u8>, value: u16) {
    let mut val = value as u32;

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if val == 0 {
            break;
        }
    }
}

/// Append a sequence length, failing if it does not fit in a `u16`.
pub fn write_compact_len(buf: &mut Vec<u8>, len: usize) -> Result<(), SdkError> {
    let value = u16::try_from(len).map_err(|_| SdkError::LengthOverflow(len))?;
    write_compact_u16(buf, value);
    Ok(())
}

/// Decode a compact-u16 value from the start of `data`.
///
/// Returns `(value, bytes_consumed)`. Fails with [`SdkError::MalformedLength`]
/// when the input ends mid-sequence, the continuation runs past three bytes,
/// the value overflows `u16`, or the encoding is not the shortest one.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SdkError> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().take(MAX_ENCODING_LENGTH).enumerate() {
        // A zero trailing group would alias a shorter encoding.
        if i > 0 && byte == 0 {
            return Err(SdkError::MalformedLength);
        }

        value |= ((byte & 0x7f) as u32) << (7 * i);

        if byte & 0x80 == 0 {
            let value = u16::try_from(value).map_err(|_| SdkError::MalformedLength)?;
            return Ok((value, i + 1));
        }
    }

    Err(SdkError::MalformedLength)
}

/// Forward-only cursor over wire bytes.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn read_u8(&mut self, what: &str) -> Result<u8, SdkError> {
        Ok(self.read_bytes(1, what)?[0])
    }

    pub(crate) fn read_compact_len(&mut self) -> Result<usize, SdkError> {
        let (value, consumed) = decode_compact_u16(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(value as usize)
    }

    pub(crate) fn read_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8], SdkError> {
        if self.remaining() < len {
            return Err(SdkError::MalformedTransaction(format!(
                "unexpected end of data reading {what}: need {len} bytes, have {}",
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], SdkError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- encoding -----------------------------------------------------------

    #[test]
    fn compact_u16_zero() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
    }

    #[test]
    fn compact_u16_one_byte_max() {
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
    }

    #[test]
    fn compact_u16_boundary_128() {
        assert_eq!(encode_compact_u16(128), vec![0x80, 0x01]);
    }

    #[test]
    fn compact_u16_two_byte_max() {
        assert_eq!(encode_compact_u16(16383), vec![0xff, 0x7f]);
    }

    #[test]
    fn compact_u16_boundary_16384() {
        assert_eq!(encode_compact_u16(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn compact_u16_max_value() {
        // 0x7f | 0x7f << 7 | 0x03 << 14 = 65535
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn compact_len_rejects_overflow() {
        let mut buf = Vec::new();
        assert_eq!(
            write_compact_len(&mut buf, 70_000),
            Err(SdkError::LengthOverflow(70_000))
        );
        assert!(buf.is_empty());
    }

    // -- decoding -----------------------------------------------------------

    #[test]
    fn decode_roundtrip_boundaries() {
        for value in [0u16, 127, 128, 16383, 16384, u16::MAX] {
            let encoded = encode_compact_u16(value);
            let (decoded, len) = decode_compact_u16(&encoded).unwrap();
            assert_eq!(decoded, value, "roundtrip failed for {value}");
            assert_eq!(len, encoded.len());
        }
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let (val, len) = decode_compact_u16(&[0x80, 0x01, 0xaa, 0xbb]).unwrap();
        assert_eq!(val, 128);
        assert_eq!(len, 2);
    }

    #[test]
    fn decode_empty_input_fails() {
        assert_eq!(decode_compact_u16(&[]), Err(SdkError::MalformedLength));
    }

    #[test]
    fn decode_truncated_sequence_fails() {
        assert_eq!(decode_compact_u16(&[0x80]), Err(SdkError::MalformedLength));
        assert_eq!(
            decode_compact_u16(&[0xff, 0xff]),
            Err(SdkError::MalformedLength)
        );
    }

    #[test]
    fn decode_four_byte_sequence_fails() {
        assert_eq!(
            decode_compact_u16(&[0x80, 0x80, 0x80, 0x01]),
            Err(SdkError::MalformedLength)
        );
    }

    #[test]
    fn decode_overflow_fails() {
        // 0x04 << 14 = 65536
        assert_eq!(
            decode_compact_u16(&[0x80, 0x80, 0x04]),
            Err(SdkError::MalformedLength)
        );
    }

    #[test]
    fn decode_non_minimal_encoding_fails() {
        assert_eq!(
            decode_compact_u16(&[0x80, 0x00]),
            Err(SdkError::MalformedLength)
        );
        assert_eq!(
            decode_compact_u16(&[0x81, 0x80, 0x00]),
            Err(SdkError::MalformedLength)
        );
    }

    // -- reader ---------------------------------------------------------------

    #[test]
    fn reader_walks_fields_in_order() {
        let data = [0x02, 0xaa, 0xbb, 0x07];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_compact_len().unwrap(), 2);
        assert_eq!(reader.read_bytes(2, "payload").unwrap(), &[0xaa, 0xbb]);
        assert_eq!(reader.read_u8("tail").unwrap(), 0x07);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn reader_reports_short_input() {
        let mut reader = ByteReader::new(&[0x01, 0x02]);
        let err = reader.read_array::<32>("blockhash").unwrap_err();
        assert!(err.to_string().contains("blockhash"));
    }
}
