//! Packed UTF-8 codepoints.
//!
//! The glyph cache keys glyphs by the raw UTF-8 bytes of a character packed
//! into a `u32`, most significant byte first. ASCII maps to itself, so
//! `'A'` is `0x41` while `'é'` (`C3 A9`) is `0xC3A9`. Keys are never
//! validated as Unicode scalar values.

/// A packed UTF-8 cache key.
pub type Codepoint = u32;

/// Number of bytes in the UTF-8 sequence started by `lead`.
///
/// Continuation bytes are not distinguished from lead bytes; anything below
/// `0xE0` that is not ASCII counts as a two-byte lead.
#[inline]
pub const fn char_size(lead: u8) -> usize {
    if lead <= 0x7F {
        1
    } else if lead < 0xE0 {
        2
    } else if lead < 0xF0 {
        3
    } else {
        4
    }
}

/// Decode the sequence starting at `bytes[*cursor]`.
///
/// With `advance_cursor`, `cursor` is moved past every consumed byte except
/// the last one, so a byte-stepping loop lands on the next character after
/// its own increment. Bytes past the end of `bytes` read as zero.
pub fn decode(bytes: &[u8], cursor: &mut usize, advance_cursor: bool) -> Codepoint {
    let start = *cursor;
    let Some(&lead) = bytes.get(start) else {
        return 0;
    };
    let size = char_size(lead);
    let mut result: Codepoint = 0;
    for i in 0..size {
        let byte = bytes.get(start + i).copied().unwrap_or(0);
        result = (result << 8) | byte as Codepoint;
    }
    if advance_cursor {
        *cursor = start + size - 1;
    }
    result
}

/// Decode the sequence at `offset` without moving anything.
#[inline]
pub fn decode_at(bytes: &[u8], offset: usize) -> Codepoint {
    let mut cursor = offset;
    decode(bytes, &mut cursor, false)
}

/// Cache key of a single character.
pub fn codepoint_of(c: char) -> Codepoint {
    let mut buf = [0u8; 4];
    let encoded = c.encode_utf8(&mut buf);
    decode_at(encoded.as_bytes(), 0)
}

/// The UTF-8 bytes of a codepoint plus a trailing NUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedCodepoint {
    buf: [u8; 5],
    len: usize,
}

impl EncodedCodepoint {
    /// The encoded bytes without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The encoded bytes followed by the NUL terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }

    /// The bytes as a string slice, when they form valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Unpack a codepoint into bytes, dropping leading zero bytes.
pub fn encode(codepoint: Codepoint) -> EncodedCodepoint {
    let bytes = codepoint.to_be_bytes();
    let skip = bytes.iter().take(3).take_while(|&&b| b == 0).count();
    let mut buf = [0u8; 5];
    let mut len = 0;
    for &b in &bytes[skip..] {
        buf[len] = b;
        len += 1;
    }
    if len == 1 && buf[0] == 0 {
        len = 0;
    }
    EncodedCodepoint { buf, len }
}

/// The character a codepoint stands for, if it is valid UTF-8.
pub fn char_of(codepoint: Codepoint) -> Option<char> {
    encode(codepoint).as_str().and_then(|s| s.chars().next())
}

/// Iterator over `(byte_offset, codepoint)` pairs of a string.
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Codepoints<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            cursor: 0,
        }
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = (usize, Codepoint);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.bytes.len() {
            return None;
        }
        let start = self.cursor;
        let cp = decode(self.bytes, &mut self.cursor, true);
        self.cursor += 1;
        Some((start, cp))
    }
}

/// Shorthand for [`Codepoints::new`].
pub fn codepoints(text: &str) -> Codepoints<'_> {
    Codepoints::new(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_size() {
        assert_eq!(char_size(b'a'), 1);
        assert_eq!(char_size(0xC3), 2);
        assert_eq!(char_size(0xE2), 3);
        assert_eq!(char_size(0xF0), 4);
    }

    #[test]
    fn test_ascii_maps_to_itself() {
        assert_eq!(codepoint_of('A'), 0x41);
        assert_eq!(encode(0x41).as_bytes(), b"A");
    }

    #[test]
    fn test_multibyte_packing() {
        assert_eq!(codepoint_of('é'), 0xC3A9);
        assert_eq!(codepoint_of('€'), 0xE282AC);
        assert_eq!(codepoint_of('😀'), 0xF09F9880);
        assert_eq!(encode(0xE282AC).as_bytes(), "€".as_bytes());
    }

    #[test]
    fn test_decode_cursor_stops_on_last_byte() {
        let bytes = "é!".as_bytes();
        let mut cursor = 0;
        assert_eq!(decode(bytes, &mut cursor, true), 0xC3A9);
        assert_eq!(cursor, 1);
        cursor += 1;
        assert_eq!(decode(bytes, &mut cursor, true), u32::from(b'!'));
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_decode_without_advance() {
        let bytes = "€".as_bytes();
        let mut cursor = 0;
        decode(bytes, &mut cursor, false);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_truncated_sequence_reads_zero() {
        let bytes = [0xE2, 0x82];
        assert_eq!(decode_at(&bytes, 0), 0xE28200);
    }

    #[test]
    fn test_encoded_is_nul_terminated() {
        let enc = encode(0xC3A9);
        assert_eq!(enc.len(), 2);
        assert_eq!(enc.as_bytes_with_nul(), &[0xC3, 0xA9, 0]);
    }

    #[test]
    fn test_roundtrip_over_text() {
        let text = "Grüße, 世界 😀\n";
        for (offset, cp) in codepoints(text) {
            assert_eq!(decode_at(encode(cp).as_bytes(), 0), cp);
            assert!(text.is_char_boundary(offset));
        }
        let collected: String = codepoints(text).filter_map(|(_, cp)| char_of(cp)).collect();
        assert_eq!(collected, text);
    }
}
