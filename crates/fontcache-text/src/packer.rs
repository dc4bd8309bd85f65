//! Shelf packing of fixed-height glyph cells.
//!
//! Glyph cells are all one line tall, so each atlas level is cut into rows
//! of `line_height + PADDING` and filled left to right. The packer only
//! moves a cursor; it never touches textures.

use fontcache_core::geometry::{Rect, Size};

use crate::glyph_map::GlyphEntry;

/// Gap kept around every glyph and along every atlas edge.
pub const PADDING: i32 = 1;

/// The packing frontier: the last placed cell and the level it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingCursor {
    pub level: usize,
    pub x: i32,
    pub y: i32,
    pub row_width: i32,
}

impl PackingCursor {
    /// A cursor at the top-left of `level`.
    pub const fn at_level(level: usize) -> Self {
        Self {
            level,
            x: PADDING,
            y: PADDING,
            row_width: 0,
        }
    }
}

impl Default for PackingCursor {
    fn default() -> Self {
        Self::at_level(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    /// The current level is full. The cursor already points at the start of
    /// `next_level`.
    Exhausted { next_level: usize },
    /// The glyph cannot fit even on an empty level.
    Oversized { width: i32, atlas: Size<i32> },
}

impl std::fmt::Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::Exhausted { next_level } => {
                write!(f, "Atlas level exhausted, continuing on level {}", next_level)
            }
            PackError::Oversized { width, atlas } => write!(
                f,
                "Glyph {} px wide does not fit a {}x{} atlas",
                width, atlas.width, atlas.height
            ),
        }
    }
}

impl std::error::Error for PackError {}

#[derive(Debug, Clone)]
pub struct AtlasPacker {
    cursor: PackingCursor,
    line_height: i32,
}

impl AtlasPacker {
    pub fn new(line_height: i32) -> Self {
        Self {
            cursor: PackingCursor::default(),
            line_height,
        }
    }

    pub fn cursor(&self) -> PackingCursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: PackingCursor) {
        self.cursor = cursor;
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn set_line_height(&mut self, line_height: i32) {
        self.line_height = line_height;
    }

    pub fn row_height(&self) -> i32 {
        self.line_height + PADDING
    }

    /// Whether a `width` wide cell fits on an empty `atlas` at all.
    pub fn fits_empty(&self, width: i32, atlas: Size<i32>) -> bool {
        let fresh = PackingCursor::at_level(0);
        fresh.x + fresh.row_width + 1 + PADDING + width <= atlas.width - PADDING
            && fresh.y + self.line_height <= atlas.height - PADDING
    }

    /// Reserve a `width` wide cell on the cursor's level of size `atlas`.
    pub fn pack(&mut self, width: i32, atlas: Size<i32>) -> Result<GlyphEntry, PackError> {
        if !self.fits_empty(width, atlas) {
            return Err(PackError::Oversized { width, atlas });
        }

        let c = &mut self.cursor;
        let row_height = self.line_height + PADDING;
        if c.x + c.row_width + 1 + PADDING + width > atlas.width - PADDING {
            if c.y + 2 * row_height > atlas.height - PADDING {
                let next_level = c.level + 1;
                *c = PackingCursor::at_level(next_level);
                return Err(PackError::Exhausted { next_level });
            }
            c.x = PADDING;
            c.y += row_height;
            c.row_width = 0;
        }

        c.x += c.row_width + 1 + PADDING;
        c.row_width = width;

        Ok(GlyphEntry::new(
            c.level,
            Rect::new(c.x, c.y, width, self.line_height),
        ))
    }

    /// Move the cursor to the start of `level`.
    pub fn start_level(&mut self, level: usize) {
        self.cursor = PackingCursor::at_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: Size<i32> = Size {
        width: 40,
        height: 40,
    };

    #[test]
    fn test_first_cell_skips_padding() {
        let mut packer = AtlasPacker::new(10);
        let entry = packer.pack(5, ATLAS).unwrap();
        assert_eq!(entry, GlyphEntry::new(0, Rect::new(3, 1, 5, 10)));
    }

    #[test]
    fn test_same_row_advances_x() {
        let mut packer = AtlasPacker::new(10);
        packer.pack(5, ATLAS).unwrap();
        let second = packer.pack(5, ATLAS).unwrap();
        assert_eq!(second.rect.x, 3 + 5 + 2);
        assert_eq!(second.rect.y, 1);
        assert_eq!(second.cache_level, 0);
    }

    #[test]
    fn test_wraps_to_next_row() {
        let mut packer = AtlasPacker::new(10);
        for _ in 0..3 {
            packer.pack(10, ATLAS).unwrap();
        }
        // a row holds three cells at x = 3, 15, 27
        let entry = packer.pack(10, ATLAS).unwrap();
        assert_eq!(entry.rect.y, 1 + 11);
        assert_eq!(entry.rect.x, 3);
    }

    #[test]
    fn test_exhausts_level() {
        let mut packer = AtlasPacker::new(10);
        let mut placed = Vec::new();
        let err = loop {
            match packer.pack(10, ATLAS) {
                Ok(entry) => placed.push(entry),
                Err(e) => break e,
            }
        };
        assert_eq!(err, PackError::Exhausted { next_level: 1 });
        assert_eq!(packer.cursor(), PackingCursor::at_level(1));
        assert!(placed.iter().all(|e| e.cache_level == 0));

        let bounds = Rect::new(0, 0, ATLAS.width, ATLAS.height);
        for entry in &placed {
            assert!(bounds.contains_with_margin(&entry.rect, PADDING));
        }
    }

    #[test]
    fn test_oversized_leaves_cursor() {
        let mut packer = AtlasPacker::new(10);
        packer.pack(5, ATLAS).unwrap();
        let before = packer.cursor();
        let err = packer.pack(100, ATLAS).unwrap_err();
        assert!(matches!(err, PackError::Oversized { width: 100, .. }));
        assert_eq!(packer.cursor(), before);
    }

    #[test]
    fn test_too_tall_line_is_oversized() {
        let mut packer = AtlasPacker::new(50);
        assert!(matches!(
            packer.pack(1, ATLAS),
            Err(PackError::Oversized { .. })
        ));
    }

    #[test]
    fn test_zero_width_cell() {
        let mut packer = AtlasPacker::new(10);
        let entry = packer.pack(0, ATLAS).unwrap();
        assert_eq!(entry.rect.width, 0);
        assert_eq!(entry.rect.height, 10);
    }
}
