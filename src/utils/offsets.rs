// file: src/utils/offsets.rs
// description: byte offset to character offset conversion for document positions

/// Converts byte offsets in one text into character offsets.
///
/// Regex and markdown events report byte offsets, while every position the
/// crate exposes counts characters. Lookups are expected in ascending order;
/// each one only scans the bytes since the previous lookup.
#[derive(Debug, Clone)]
pub struct CharOffsets<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Character offset of `byte`, which must lie on a char boundary.
    /// Offsets past the end map to the text's character count.
    pub fn char_offset(&mut self, byte: usize) -> usize {
        let byte = byte.min(self.text.len());
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }

        self.chars += self
            .text
            .get(self.byte..byte)
            .map_or(0, |scanned| scanned.chars().count());
        self.byte = byte;
        self.chars
    }
}
