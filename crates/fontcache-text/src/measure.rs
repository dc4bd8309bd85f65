//! Measurement, wrapping queries and hit testing.
//!
//! Widths are the plain sum of glyph advances. Letter spacing is a drawing
//! setting and is not included. A codepoint that cannot be resolved counts
//! as a space; one that cannot fall back to a space counts as nothing.

use fontcache_core::geometry::Rect;
use fontcache_render::RenderBackend;

use crate::codec::codepoints;
use crate::draw::NEWLINE;
use crate::font::Font;
use crate::layout::break_lines;

impl Font {
    /// Height of `text`: every `\n` adds a line and the line spacing.
    pub fn height(&self, text: &str) -> i32 {
        let lines = text.matches('\n').count() as i32 + 1;
        self.line_height() * lines + self.line_spacing * (lines - 1)
    }

    /// Width of the widest `\n`-separated line of `text`.
    pub fn width(&mut self, backend: &mut dyn RenderBackend, text: &str) -> i32 {
        let mut widest = 0;
        let mut width = 0;
        for (_, codepoint) in codepoints(text) {
            if codepoint == NEWLINE {
                widest = widest.max(width);
                width = 0;
                continue;
            }
            if let Some((_, entry)) = self.glyph_or_space(backend, codepoint) {
                width += entry.rect.width;
            }
        }
        widest.max(width)
    }

    /// With no text, the font's ascent. Otherwise the tallest glyph cell in
    /// `text`.
    pub fn ascent(&mut self, backend: &mut dyn RenderBackend, text: Option<&str>) -> i32 {
        match text {
            None => self.font_ascent(),
            Some(text) => self.tallest_glyph(backend, text),
        }
    }

    /// With no text, the font's descent. Otherwise the tallest glyph cell in
    /// `text`, the same value [`Font::ascent`] reports.
    pub fn descent(&mut self, backend: &mut dyn RenderBackend, text: Option<&str>) -> i32 {
        match text {
            None => self.font_descent(),
            Some(text) => self.tallest_glyph(backend, text),
        }
    }

    fn tallest_glyph(&mut self, backend: &mut dyn RenderBackend, text: &str) -> i32 {
        let mut max = 0;
        for (_, codepoint) in codepoints(text) {
            if codepoint == 0 {
                continue;
            }
            if let Ok(entry) = self.glyph(backend, codepoint) {
                max = max.max(entry.rect.height);
            }
        }
        max
    }

    /// `text` broken into lines no wider than `width`. A width of zero or
    /// less only breaks at `\n`.
    pub fn wrapped_lines(
        &mut self,
        backend: &mut dyn RenderBackend,
        width: i32,
        text: &str,
    ) -> Vec<String> {
        break_lines(text, Some(width), false, |line| self.width(backend, line))
    }

    /// The wrapped lines joined with `\n`. Empty for a zero width.
    pub fn wrapped_text(&mut self, backend: &mut dyn RenderBackend, width: i32, text: &str) -> String {
        if width == 0 {
            return String::new();
        }
        self.wrapped_lines(backend, width, text).join("\n")
    }

    /// Height of `text` wrapped to `width`. A zero width reports one line.
    pub fn column_height(&mut self, backend: &mut dyn RenderBackend, width: i32, text: &str) -> i32 {
        if width == 0 {
            return self.line_height();
        }
        self.wrapped_lines(backend, width, text).len() as i32 * self.line_height()
    }

    /// Caret rectangle just after the `index`-th character of `text`
    /// wrapped to `column`.
    ///
    /// `None` or a negative column means unlimited. Index 0 or a zero column
    /// give the origin. An index past the end puts the caret after the last
    /// line.
    pub fn caret_offset(
        &mut self,
        backend: &mut dyn RenderBackend,
        index: usize,
        column: Option<i32>,
        text: &str,
    ) -> Rect<i32> {
        let line_height = self.line_height();
        let mut result = Rect::new(0, 0, 1, line_height);
        if index == 0 || column == Some(0) {
            return result;
        }

        let lines = break_lines(text, column, true, |line| self.width(backend, line));
        let mut remaining = index;
        let mut num_lines = 0;
        for (i, line) in lines.iter().enumerate() {
            num_lines += 1;

            let hit = line.char_indices().find_map(|(offset, c)| {
                remaining -= 1;
                (remaining == 0).then_some(offset + c.len_utf8())
            });
            if let Some(end) = hit {
                result.x = self.width(backend, &line[..end]);
                break;
            }
            if i + 1 == lines.len() {
                result.x = self.width(backend, line);
            }
        }

        if num_lines > 1 {
            result.y = (num_lines - 1) * line_height;
        }
        result
    }

    /// Character index under `(x, y)` in `text` wrapped to `column`.
    ///
    /// Glyph cells are hit inclusively on all edges. A point past the end of
    /// a line resolves to the start of the next one; a point below the text
    /// resolves to its length.
    pub fn position_from_offset(
        &mut self,
        backend: &mut dyn RenderBackend,
        x: i32,
        y: i32,
        column: Option<i32>,
        text: &str,
    ) -> usize {
        if column == Some(0) {
            return 0;
        }

        let line_height = self.line_height();
        let lines = break_lines(text, column, true, |line| self.width(backend, line));
        let mut position = 0;
        let mut cur_y = 0;

        'lines: for line in &lines {
            let mut cur_x = 0;
            for (_, codepoint) in codepoints(line) {
                if codepoint != NEWLINE {
                    if let Ok(entry) = self.glyph(backend, codepoint) {
                        let cell = Rect::new(cur_x, cur_y, entry.rect.width, entry.rect.height);
                        if cell.contains_point(x, y) {
                            break 'lines;
                        }
                        cur_x += entry.rect.width;
                    }
                }
                position += 1;
            }
            cur_y += line_height;
            if y < cur_y {
                break;
            }
        }

        position
    }
}
