use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::{ClassFileError, Result};

type Endian = BigEndian;

/// Forward-only big-endian reader over a class file stream.
///
/// Reads never go past what the caller asks for, so the underlying stream is
/// left positioned right after the last value read.
pub struct ByteReader<R> {
    r: R,
    position: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(r: R) -> Self {
        Self { r, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let v = self.r.read_u8()?;
        self.position += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let v = self.r.read_u16::<Endian>()?;
        self.position += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let v = self.r.read_u32::<Endian>()?;
        self.position += 4;
        Ok(v)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let v = self.r.read_u64::<Endian>()?;
        self.position += 8;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let v = self.r.read_i32::<Endian>()?;
        self.position += 4;
        Ok(v)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let v = self.r.read_i64::<Endian>()?;
        self.position += 8;
        Ok(v)
    }

    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>> {
        let mut values = vec![0u16; count];
        self.r.read_u16_into::<Endian>(&mut values)?;
        self.position += 2 * count as u64;
        Ok(values)
    }

    /// Reads exactly `n` bytes.
    ///
    /// The buffer grows with what the stream actually delivers, so a bogus
    /// length on a short stream fails with `TruncatedInput` instead of
    /// allocating the declared size up front.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = (&mut self.r).take(n as u64).read_to_end(&mut buf)?;
        self.position += read as u64;

        if read != n {
            return Err(ClassFileError::TruncatedInput);
        }

        Ok(buf)
    }

    /// Decodes `char_count` characters of modified UTF-8.
    ///
    /// A character here is one UTF-16 code unit; surrogate pairs are joined
    /// back together and unpaired surrogates become U+FFFD.
    pub fn read_modified_text(&mut self, char_count: usize) -> Result<String> {
        let units = (0..char_count)
            .map(|_| self.read_code_unit())
            .collect::<Result<Vec<_>>>()?;

        Ok(String::from_utf16_lossy(&units))
    }

    fn read_code_unit(&mut self) -> Result<u16> {
        let a = self.read_u8()?;
        if a <= 0x7F {
            return Ok(a as u16);
        }

        let b = self.read_u8()?;
        if a & 0xE0 == 0xC0 {
            return Ok(two_byte_unit(a, b));
        }

        let c = self.read_u8()?;
        Ok(three_byte_unit(a, b, c))
    }
}

fn two_byte_unit(a: u8, b: u8) -> u16 {
    ((a as u16 & 0x1F) << 6) | (b as u16 & 0x3F)
}

fn three_byte_unit(a: u8, b: u8, c: u8) -> u16 {
    ((a as u16 & 0x0F) << 12) | ((b as u16 & 0x3F) << 6) | (c as u16 & 0x3F)
}

/// Decodes a whole block of modified UTF-8, as stored by a UTF8 constant.
///
/// Never fails: a sequence cut short by the end of the block becomes U+FFFD.
pub fn decode_modified_text(bytes: &[u8]) -> String {
    let mut units = Vec::with_capacity(bytes.len());
    let mut rest = bytes;

    while let Some((&a, tail)) = rest.split_first() {
        let (unit, tail) = match (a, tail) {
            (0x00..=0x7F, _) => (a as u16, tail),
            (_, [b, tail @ ..]) if a & 0xE0 == 0xC0 => (two_byte_unit(a, *b), tail),
            (_, [b, c, tail @ ..]) if a & 0xE0 != 0xC0 => (three_byte_unit(a, *b, *c), tail),
            _ => (0xFFFD, &[][..]),
        };
        units.push(unit);
        rest = tail;
    }

    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(bytes: &[u8]) -> ByteReader<&[u8]> {
        ByteReader::new(bytes)
    }

    #[test]
    fn reads_big_endian_primitives() {
        let mut r = reader(&[
            0x10, 0x01, 0x02, 0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
            0x08,
        ]);

        assert_eq!(0x10, r.read_u8().unwrap());
        assert_eq!(0x0102, r.read_u16().unwrap());
        assert_eq!(0x01020304, r.read_u32().unwrap());
        assert_eq!(0x0102030405060708, r.read_u64().unwrap());
        assert_eq!(15, r.position());
    }

    #[test]
    fn short_reads_are_truncated_input() {
        assert!(matches!(
            reader(&[]).read_u8(),
            Err(ClassFileError::TruncatedInput)
        ));
        assert!(matches!(
            reader(&[0x01]).read_u16(),
            Err(ClassFileError::TruncatedInput)
        ));
        assert!(matches!(
            reader(&[0x01, 0x02, 0x03]).read_u32(),
            Err(ClassFileError::TruncatedInput)
        ));
        assert!(matches!(
            reader(&[0; 7]).read_u64(),
            Err(ClassFileError::TruncatedInput)
        ));
    }

    #[test]
    fn read_bytes_is_exact() {
        let mut r = reader(&[1, 2, 3, 4]);
        assert_eq!(vec![1, 2, 3], r.read_bytes(3).unwrap());
        assert!(matches!(r.read_bytes(2), Err(ClassFileError::TruncatedInput)));
    }

    #[test]
    fn read_bytes_with_huge_length_on_short_input() {
        let mut r = reader(&[1, 2]);
        assert!(matches!(
            r.read_bytes(u32::MAX as usize),
            Err(ClassFileError::TruncatedInput)
        ));
    }

    #[test]
    fn modified_text_ascii() {
        assert_eq!("Foo", reader(&[0x46, 0x6F, 0x6F]).read_modified_text(3).unwrap());
    }

    #[test]
    fn modified_text_two_and_three_byte_sequences() {
        // U+00E9, U+07FF, U+0800, U+FFFF
        let bytes = [0xC3, 0xA9, 0xDF, 0xBF, 0xE0, 0xA0, 0x80, 0xEF, 0xBF, 0xBF];
        assert_eq!(
            "\u{E9}\u{7FF}\u{800}\u{FFFF}",
            reader(&bytes).read_modified_text(4).unwrap()
        );
    }

    #[test]
    fn modified_text_encoded_nul() {
        assert_eq!("a\0b", reader(&[0x61, 0xC0, 0x80, 0x62]).read_modified_text(3).unwrap());
    }

    #[test]
    fn modified_text_surrogate_pair() {
        // U+1F600 as the surrogate pair D83D DE00, each in three bytes
        let bytes = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        assert_eq!("\u{1F600}", reader(&bytes).read_modified_text(2).unwrap());
        assert_eq!("\u{1F600}", decode_modified_text(&bytes));
    }

    #[test]
    fn modified_text_truncated_continuation() {
        assert!(matches!(
            reader(&[0xC3]).read_modified_text(1),
            Err(ClassFileError::TruncatedInput)
        ));
        assert!(matches!(
            reader(&[0xE0, 0xA0]).read_modified_text(1),
            Err(ClassFileError::TruncatedInput)
        ));
    }

    #[test]
    fn decode_block_replaces_cut_sequences() {
        assert_eq!("java/lang/Object", decode_modified_text(b"java/lang/Object"));
        assert_eq!("a\u{FFFD}", decode_modified_text(&[0x61, 0xE0, 0xA0]));
        assert_eq!("", decode_modified_text(&[]));
    }
}
