//! Character-indexed editing of UTF-8 strings, and the stock loading
//! strings used for preloading.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_pos`. One past the last character
/// maps to `text.len()`.
pub fn byte_offset(text: &str, char_pos: usize) -> Option<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .nth(char_pos)
}

/// The character at `char_pos`.
pub fn char_at(text: &str, char_pos: usize) -> Option<char> {
    text.chars().nth(char_pos)
}

/// Insert `src` before the character at `char_pos`. Returns `false` and
/// leaves `text` untouched when `char_pos` is past the end.
pub fn insert_at(text: &mut String, char_pos: usize, src: &str) -> bool {
    match byte_offset(text, char_pos) {
        Some(offset) => {
            text.insert_str(offset, src);
            true
        }
        None => false,
    }
}

/// Remove and return the character at `char_pos`.
pub fn remove_at(text: &mut String, char_pos: usize) -> Option<char> {
    let offset = byte_offset(text, char_pos)?;
    if offset == text.len() {
        return None;
    }
    Some(text.remove(offset))
}

/// Ready-made loading strings.
pub mod loading {
    /// Printable ASCII, `0x20..=0x7E`.
    pub const ASCII: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

    /// Latin-1 supplement, `U+00A0..=U+00FF`.
    pub const LATIN_1: &str = "\u{a0}¡¢£¤¥¦§¨©ª«¬\u{ad}®¯°±²³´µ¶·¸¹º»¼½¾¿ÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖ×ØÙÚÛÜÝÞßàáâãäåæçèéêëìíîïðñòóôõö÷øùúûüýþÿ";

    /// [`ASCII`] followed by [`LATIN_1`].
    pub const ASCII_LATIN_1: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~\u{a0}¡¢£¤¥¦§¨©ª«¬\u{ad}®¯°±²³´µ¶·¸¹º»¼½¾¿ÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖ×ØÙÚÛÜÝÞßàáâãäåæçèéêëìíîïðñòóôõö÷øùúûüýþÿ";
}
